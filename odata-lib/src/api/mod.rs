//! Query composition and execution

mod decode;
mod executor;
pub mod query;
mod service;
mod transport;

pub use decode::*;
pub use executor::*;
pub use service::*;
pub use transport::*;
