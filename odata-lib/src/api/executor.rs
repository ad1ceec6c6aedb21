//! Query execution against a transport

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;

use super::decode::Decode;
use super::query::PagingToken;
use super::transport::Request;
use super::transport::Transport;
use super::transport::TransportResponse;
use crate::error::ApiError;
use crate::error::Error;
use crate::literal::ToLiteral;
use crate::literal::is_relative_reference;
use crate::model::Parameter;

/// Executes rendered query expressions and decodes their results.
///
/// Every operation resolves to either a decoded result or an error; there
/// is no cancellation.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// The decoded result of one request.
    type Output: Default + Send;

    /// Submits a rendered query expression.
    async fn execute_query(&self, expression: &str) -> Result<Self::Output, Error>;

    /// Fetches the page a paging token points at.
    async fn execute_paged_query(&self, token: &PagingToken) -> Result<Self::Output, Error>;

    /// Invokes a function (`is_function == true`) or an action bound to
    /// `path`.
    async fn execute_operation_query(
        &self,
        path: &str,
        parameters: &[Parameter],
        is_function: bool,
    ) -> Result<Self::Output, Error>;
}

/// The standard executor: submits requests through a [`Transport`] and
/// decodes successful responses with a [`Decode`] implementation.
///
/// Relative expressions and paging tokens are resolved against the service
/// root; absolute ones are sent as-is.
pub struct ODataExecutor<D> {
    transport: Arc<dyn Transport>,
    service_root: String,
    decoder: D,
}

impl<D: Decode> ODataExecutor<D> {
    /// Creates a new executor.
    pub fn new(transport: Arc<dyn Transport>, service_root: impl Into<String>, decoder: D) -> Self {
        Self {
            transport,
            service_root: service_root.into(),
            decoder,
        }
    }

    /// Returns the service root URL.
    pub fn service_root(&self) -> &str {
        &self.service_root
    }

    /// Resolves an expression or link to an absolute URL.
    pub fn resolve(&self, reference: &str) -> String {
        if is_relative_reference(&self.service_root, reference) && url::Url::parse(reference).is_err() {
            format!(
                "{}/{}",
                self.service_root.trim_end_matches('/'),
                reference.trim_start_matches('/')
            )
        } else {
            reference.to_string()
        }
    }

    async fn send(&self, request: Request) -> Result<D::Output, Error> {
        log::debug!("{} {}", request.method, request.url);
        let response = self.transport.submit(request).await?;
        self.handle_response(response)
    }

    fn handle_response(&self, response: TransportResponse) -> Result<D::Output, Error> {
        if !response.is_success() {
            return Err(ApiError::from_response(response.status, response.body).into());
        }

        self.decoder.decode(&response.body)
    }
}

#[async_trait]
impl<D: Decode> QueryExecutor for ODataExecutor<D> {
    type Output = D::Output;

    async fn execute_query(&self, expression: &str) -> Result<D::Output, Error> {
        self.send(Request::get(self.resolve(expression))).await
    }

    async fn execute_paged_query(&self, token: &PagingToken) -> Result<D::Output, Error> {
        log::debug!("Following paging token {}", token);
        self.send(Request::get(self.resolve(token.as_str()))).await
    }

    async fn execute_operation_query(
        &self,
        path: &str,
        parameters: &[Parameter],
        is_function: bool,
    ) -> Result<D::Output, Error> {
        let request = if is_function {
            Request::get(self.resolve(&function_path(path, parameters)))
        } else {
            Request::post(self.resolve(path), action_body(parameters)?)
        };
        self.send(request).await
    }
}

/// Appends inline function parameters (`Fn(a=1,b='x')`) to the resource
/// path, ahead of any query options.
fn function_path(path: &str, parameters: &[Parameter]) -> String {
    let arguments: Vec<_> = parameters
        .iter()
        .map(|p| format!("{}={}", p.name, p.value.to_literal()))
        .collect();
    let call = format!("({})", arguments.join(","));

    match path.split_once('?') {
        Some((resource, options)) => format!("{}{}?{}", resource, call, options),
        None => format!("{}{}", path, call),
    }
}

/// Serializes action parameters as a JSON object body.
fn action_body(parameters: &[Parameter]) -> Result<String, Error> {
    let body: Map<String, serde_json::Value> = parameters
        .iter()
        .map(|p| (p.name.clone(), p.value.to_json()))
        .collect();
    Ok(serde_json::to_string(&body)?)
}
