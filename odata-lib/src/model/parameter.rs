//! Operation parameters

use super::Value;

/// A named argument passed to a function or action.
///
/// Function parameters are rendered inline in the URL
/// (`Operation(name=literal)`); action parameters are sent as members of the
/// JSON request body.
///
/// # Example
///
/// ```
/// use odata_lib::model::Parameter;
///
/// let params = [
///     Parameter::new("percentage", 10i32),
///     Parameter::new("reason", "annual review"),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// The parameter name as declared by the operation.
    pub name: String,
    /// The argument value.
    pub value: Value,
}

impl Parameter {
    /// Creates a new parameter.
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}
