//! Transport trait and request/response types

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::error::Error;

/// A request ready to be submitted to the service.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method. `GET` for queries and functions, `POST` for actions.
    pub method: Method,
    /// Absolute request URL.
    pub url: String,
    /// Extra headers on top of the transport's defaults.
    pub headers: HeaderMap,
    /// JSON request body.
    pub body: Option<String>,
}

impl Request {
    /// Creates a `GET` request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a `POST` request with a JSON body.
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Some(body.into()),
        }
    }
}

/// The raw outcome of a submitted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text. Empty for `204 No Content`.
    pub body: String,
}

impl TransportResponse {
    /// Creates a new response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns `true` for a 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Submits requests to the service.
///
/// Implementations report connection and I/O failures as errors; any
/// response that arrived, successful or not, is returned as a
/// [`TransportResponse`] so the executor can interpret its status.
///
/// [`ODataClient`](crate::ODataClient) is the HTTP implementation. Tests can
/// substitute an in-memory double.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use odata_lib::api::{Request, Transport, TransportResponse};
/// use odata_lib::error::Error;
///
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn submit(&self, _request: Request) -> Result<TransportResponse, Error> {
///         Ok(TransportResponse::new(200, r#"{"value":[]}"#))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Submits one request and waits for its response.
    async fn submit(&self, request: Request) -> Result<TransportResponse, Error>;
}
