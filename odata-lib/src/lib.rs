//! OData client library
//!
//! A Rust async client toolkit for OData v4 services: a metadata model, a
//! fluent query builder with an exact literal codec, and a paging-aware
//! execution pipeline.

pub mod api;
pub mod error;
pub mod literal;
pub mod model;

mod client;

pub use client::*;
