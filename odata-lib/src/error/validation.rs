//! Validation error types

/// A query referenced names that the metadata model does not define.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown members on '{type_name}': {}", .unknown.join(", "))]
pub struct ValidationError {
    /// The type the names were resolved against.
    pub type_name: String,
    /// The names that could not be resolved.
    pub unknown: Vec<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(type_name: impl Into<String>, unknown: Vec<String>) -> Self {
        Self {
            type_name: type_name.into(),
            unknown,
        }
    }

    /// Creates an error for a type that is not in the model at all.
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            unknown: vec![type_name.clone()],
            type_name,
        }
    }
}
