//! Service error payloads

use serde::Deserialize;

/// Structured error information returned by an OData service.
///
/// Services answer failed requests with a body of the form
/// `{"error": {"code": "...", "message": "...", "innererror": {...}}}`.
/// Some services nest further errors under `innererror`, others list them
/// under `details`; both are folded into [`inner_error`](Self::inner_error).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ODataErrorDetail {
    /// The service-defined error code.
    #[serde(default)]
    pub code: String,
    /// Human-readable error message.
    #[serde(default)]
    pub message: String,
    /// The target of the error, such as a property name.
    #[serde(default)]
    pub target: Option<String>,
    /// Nested inner error, if any.
    #[serde(default, rename = "innererror")]
    pub inner_error: Option<Box<ODataErrorDetail>>,
    /// Additional errors reported alongside this one.
    #[serde(default)]
    pub details: Vec<ODataErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ODataErrorDetail,
}

impl ODataErrorDetail {
    /// Creates a new error detail with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            target: None,
            inner_error: None,
            details: Vec::new(),
        }
    }

    /// Parses the standard error envelope from a response body.
    ///
    /// Returns `None` when the body is not an OData error payload.
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
    }

    /// Returns the innermost error in the chain.
    pub fn innermost(&self) -> &ODataErrorDetail {
        let mut current = self;
        while let Some(inner) = &current.inner_error {
            current = inner;
        }
        current
    }

    /// Checks if this error, any inner error, or any detail has the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code == code
            || self.inner_error.as_ref().is_some_and(|inner| inner.has_code(code))
            || self.details.iter().any(|detail| detail.has_code(code))
    }
}

impl std::fmt::Display for ODataErrorDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_body() {
        let body = r#"{"error":{"code":"0x80040217","message":"Not found","innererror":{"code":"Inner","message":"deeper"}}}"#;
        let detail = ODataErrorDetail::from_body(body).unwrap();

        assert_eq!(detail.code, "0x80040217");
        assert_eq!(detail.innermost().message, "deeper");
        assert!(detail.has_code("Inner"));
        assert!(!detail.has_code("Other"));
    }

    #[test]
    fn test_from_body_rejects_other_payloads() {
        assert!(ODataErrorDetail::from_body("not json").is_none());
        assert!(ODataErrorDetail::from_body(r#"{"value":[]}"#).is_none());
    }

    #[test]
    fn test_details_are_searched() {
        let mut detail = ODataErrorDetail::new("Outer", "bad request");
        detail.details.push(ODataErrorDetail::new("Field", "missing"));
        assert!(detail.has_code("Field"));
        assert_eq!(detail.to_string(), "[Outer] bad request");
    }
}
