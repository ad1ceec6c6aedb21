//! Main ODataClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use reqwest::header::HeaderValue;
use serde::de::DeserializeOwned;

use crate::api::CollectionDecoder;
use crate::api::Decode;
use crate::api::EntityDecoder;
use crate::api::ODataExecutor;
use crate::api::RawDecoder;
use crate::api::Request;
use crate::api::ServiceQuery;
use crate::api::Transport;
use crate::api::TransportResponse;
use crate::error::ApiError;
use crate::error::Error;

/// HTTP client for an OData service.
///
/// This client is cheap to clone (uses `Arc` internally) and can be shared
/// across threads safely. It is the production [`Transport`]: every request
/// carries the OData version headers, the bearer token if one was set, and
/// the page size preference.
///
/// # Example
///
/// ```ignore
/// use odata_lib::ODataClient;
///
/// let client = ODataClient::builder()
///     .url("https://services.odata.org/V4/TripPinService")
///     .max_page_size(50)
///     .build()?;
///
/// let people = client.query::<Person>("People").top(10).execute().await?;
/// ```
#[derive(Clone)]
pub struct ODataClient {
    inner: Arc<ODataClientInner>,
}

struct ODataClientInner {
    service_root: String,
    default_headers: HeaderMap,
    bearer_token: Option<String>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ODataClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> ODataClientBuilder<Missing> {
        ODataClientBuilder::new()
    }

    /// Returns the service root URL.
    pub fn service_root(&self) -> &str {
        &self.inner.service_root
    }

    /// Creates an executor bound to this client with a custom decoder.
    pub fn executor<D: Decode>(&self, decoder: D) -> ODataExecutor<D> {
        let transport: Arc<dyn Transport> = Arc::new(self.clone());
        ODataExecutor::new(transport, self.inner.service_root.clone(), decoder)
    }

    /// Starts a collection query against `root`, decoding pages of `T`.
    pub fn query<T>(&self, root: impl Into<String>) -> ServiceQuery<ODataExecutor<CollectionDecoder<T>>>
    where
        T: DeserializeOwned + Send,
    {
        ServiceQuery::new(Arc::new(self.executor(CollectionDecoder::new())), root)
    }

    /// Starts a single-entity query against `root`.
    pub fn entity<T>(&self, root: impl Into<String>) -> ServiceQuery<ODataExecutor<EntityDecoder<T>>>
    where
        T: DeserializeOwned + Send,
    {
        ServiceQuery::new(Arc::new(self.executor(EntityDecoder::new())), root)
    }

    /// Starts a query against `root` returning untyped JSON.
    pub fn raw(&self, root: impl Into<String>) -> ServiceQuery<ODataExecutor<RawDecoder>> {
        ServiceQuery::new(Arc::new(self.executor(RawDecoder)), root)
    }

    fn map_send_error(&self, error: reqwest::Error) -> ApiError {
        match self.inner.timeout {
            Some(timeout) if error.is_timeout() => ApiError::Timeout(timeout),
            _ => ApiError::Network(error),
        }
    }
}

#[async_trait]
impl Transport for ODataClient {
    async fn submit(&self, request: Request) -> Result<TransportResponse, Error> {
        let mut headers = self.inner.default_headers.clone();
        headers.extend(request.headers);

        let mut builder = self
            .inner
            .http_client
            .request(request.method, request.url.as_str())
            .headers(headers);

        if let Some(token) = &self.inner.bearer_token {
            builder = builder.bearer_auth(token);
        }

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !(200..300).contains(&status) {
            log::debug!("{} returned {}", request.url, status);
        }

        Ok(TransportResponse::new(status, body))
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing an [`ODataClient`].
///
/// Uses the typestate pattern to ensure the service root is set at compile
/// time.
///
/// # Example
///
/// ```ignore
/// let client = ODataClient::builder()
///     .url("https://services.odata.org/V4/TripPinService")
///     .bearer_token("my-token")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub struct ODataClientBuilder<Url> {
    url: Url,
    odata_version: String,
    bearer_token: Option<String>,
    max_page_size: Option<usize>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl ODataClientBuilder<Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            odata_version: "4.0".to_string(),
            bearer_token: None,
            max_page_size: None,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }

    /// Sets the service root URL.
    pub fn url(self, url: impl Into<String>) -> ODataClientBuilder<Set<String>> {
        ODataClientBuilder {
            url: Set(url.into()),
            odata_version: self.odata_version,
            bearer_token: self.bearer_token,
            max_page_size: self.max_page_size,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl Default for ODataClientBuilder<Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> ODataClientBuilder<U> {
    /// Sets the protocol version sent in `OData-Version` and
    /// `OData-MaxVersion`.
    ///
    /// Defaults to `4.0`.
    pub fn odata_version(mut self, version: impl Into<String>) -> Self {
        self.odata_version = version.into();
        self
    }

    /// Sets a static bearer token sent with every request.
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// Asks the service for at most `size` entities per page.
    pub fn max_page_size(mut self, size: usize) -> Self {
        self.max_page_size = Some(size);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    ///
    /// If not set, a default client will be created.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl ODataClientBuilder<Set<String>> {
    /// Builds the [`ODataClient`].
    ///
    /// Fails if the service root is not an absolute URL or the version is
    /// not a valid header value.
    pub fn build(self) -> Result<ODataClient, Error> {
        let service_root = self.url.0;
        url::Url::parse(&service_root)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", service_root, e)))?;

        let default_headers = default_headers(&self.odata_version, self.max_page_size)?;

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let mut builder = Client::builder();
                if let Some(timeout) = self.connect_timeout {
                    builder = builder.connect_timeout(timeout);
                }
                builder.build().map_err(ApiError::from)?
            }
        };

        Ok(ODataClient {
            inner: Arc::new(ODataClientInner {
                service_root,
                default_headers,
                bearer_token: self.bearer_token,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

fn default_headers(odata_version: &str, max_page_size: Option<usize>) -> Result<HeaderMap, Error> {
    let version = HeaderValue::from_str(odata_version).map_err(|_| {
        Error::InvalidOperation(format!("Invalid OData version '{}'", odata_version))
    })?;

    let mut headers = HeaderMap::new();
    headers.insert("OData-MaxVersion", version.clone());
    headers.insert("OData-Version", version);
    headers.insert("Content-Type", HeaderValue::from_static("application/json"));
    headers.insert("Accept", HeaderValue::from_static("application/json"));

    if let Some(size) = max_page_size {
        let prefer = HeaderValue::from_str(&format!("odata.maxpagesize={}", size))
            .map_err(|_| Error::InvalidOperation(format!("Invalid page size {}", size)))?;
        headers.insert("Prefer", prefer);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers() {
        let headers = default_headers("4.0", Some(25)).unwrap();
        assert_eq!(headers["OData-Version"], "4.0");
        assert_eq!(headers["OData-MaxVersion"], "4.0");
        assert_eq!(headers["Accept"], "application/json");
        assert_eq!(headers["Prefer"], "odata.maxpagesize=25");

        let headers = default_headers("4.01", None).unwrap();
        assert_eq!(headers["OData-Version"], "4.01");
        assert!(headers.get("Prefer").is_none());
    }

    #[test]
    fn test_invalid_version_header() {
        assert!(default_headers("4.0\n", None).is_err());
    }

    #[test]
    fn test_build_rejects_relative_root() {
        let err = ODataClient::builder().url("not a url").build().err().unwrap();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_build() {
        let client = ODataClient::builder()
            .url("https://services.odata.org/V4/TripPinService")
            .bearer_token("token")
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        assert_eq!(client.service_root(), "https://services.odata.org/V4/TripPinService");

        let query = client.raw("People").top(1);
        assert_eq!(query.query_expression().as_deref(), Some("People?$top=1"));
    }
}
