//! Transport and decode failures

use std::time::Duration;

use super::ODataErrorDetail;

/// A request that failed on its way to the service, at the service, or while
/// its response was decoded.
///
/// `Http`, `Network` and `Timeout` are transport failures; `Parse` is a
/// decode failure; `InvalidUrl` means the request was never sent.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The service answered with a non-2xx status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// The service's error message, or the raw body if it sent no
        /// error envelope.
        message: String,
        code: Option<String>,
        inner: Option<Box<ODataErrorDetail>>,
    },

    /// The request could not be delivered.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// No response within the configured timeout.
    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    /// The service root or a resolved link is not a usable URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A successful response body did not have the expected shape.
    #[error("Response parse error: {message}")]
    Parse {
        message: String,
        /// The body that failed to decode.
        body: Option<String>,
    },
}

impl ApiError {
    /// Builds the error for a non-2xx response, keeping the service's error
    /// envelope when the body carries one.
    pub fn from_response(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match ODataErrorDetail::from_body(&body) {
            Some(detail) => Self::Http {
                status,
                message: detail.message.clone(),
                code: Some(detail.code.clone()),
                inner: Some(Box::new(detail)),
            },
            None => Self::Http {
                status,
                message: body,
                code: None,
                inner: None,
            },
        }
    }

    /// A decode failure for `body`.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    /// Returns `true` for failures reaching or at the service.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. } | Self::Network(_) | Self::Timeout(_))
    }

    /// Returns `true` if a response arrived but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// The HTTP status of a service error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The top-level code from the service's error envelope.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// The service's full error envelope.
    pub fn detail(&self) -> Option<&ODataErrorDetail> {
        match self {
            Self::Http { inner, .. } => inner.as_deref(),
            _ => None,
        }
    }
}
