//! Data model types
//!
//! - [`metadata`] - the schema registry describing the service's types and containers
//! - [`Value`] - a typed primitive value usable as a filter operand or operation parameter
//! - [`Parameter`] - a named argument for function and action invocation

pub mod metadata;
mod parameter;
mod value;

pub use metadata::Model;
pub use parameter::Parameter;
pub use value::Value;
