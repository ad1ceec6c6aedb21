//! Metadata model error types

/// Errors raised while building a metadata model.
///
/// These are caller errors during the load phase. Looking up a name that does
/// not exist is not an error and never produces one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A schema with the same namespace is already registered.
    #[error("Schema '{0}' is already registered")]
    DuplicateSchema(String),

    /// A descriptor with the same local name already exists in the schema.
    #[error("{kind} '{name}' already exists in schema '{schema}'")]
    DuplicateName {
        /// The schema namespace.
        schema: String,
        /// The descriptor kind (e.g. "entity type").
        kind: &'static str,
        /// The conflicting local name.
        name: String,
    },

    /// A second container was flagged as the default container.
    #[error("Container '{attempted}' cannot be default: '{existing}' already is")]
    DuplicateDefaultContainer {
        /// The container already flagged default.
        existing: String,
        /// The container that was rejected.
        attempted: String,
    },

    /// The named schema is not registered.
    #[error("Schema '{0}' is not registered")]
    UnknownSchema(String),
}
