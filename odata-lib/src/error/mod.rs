//! Error types

mod api;
mod model;
mod odata;
mod validation;

pub use api::*;
pub use model::*;
pub use odata::*;
pub use validation::*;

/// Top-level error returned by the client, the executor and the model.
///
/// Lookup misses against the metadata model are not errors; those return
/// `None`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The service or the transport failed, or a response could not be decoded.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The metadata model rejected a build-time change.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// A query referenced names the metadata model does not know.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A required collaborator (executor or query builder) was not wired up.
    #[error("{0} is not configured")]
    ConfigurationMissing(&'static str),

    /// Failed to serialize a request body.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The request could not be built from the given inputs.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl Error {
    /// Returns `true` if this is a transport or service failure.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_transport())
    }

    /// Returns `true` if this is a response decoding failure.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Api(api) if api.is_decode())
    }
}
