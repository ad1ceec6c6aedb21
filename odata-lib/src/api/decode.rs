//! Response decoders

use std::marker::PhantomData;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::query::Page;
use super::query::PagingToken;
use crate::error::ApiError;
use crate::error::Error;

/// Turns a successful response body into a typed result.
///
/// `Output::default()` is what a coordinator hands back when it has nothing
/// to execute against, so the output type must have a meaningful empty value.
pub trait Decode: Send + Sync {
    /// The decoded result.
    type Output: Default + Send;

    /// Decodes a response body. An empty body is valid and decodes to an
    /// empty result.
    fn decode(&self, body: &str) -> Result<Self::Output, Error>;
}

/// Wire shape of a collection response.
#[derive(Deserialize)]
struct CollectionEnvelope<T> {
    value: Vec<T>,
    #[serde(rename = "@odata.nextLink")]
    next_link: Option<String>,
    #[serde(rename = "@odata.count")]
    count: Option<usize>,
}

/// Decodes a collection response (`{"value": [...]}`) into a [`Page`],
/// capturing `@odata.nextLink` and `@odata.count`.
pub struct CollectionDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> CollectionDecoder<T> {
    /// Creates a new collection decoder.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for CollectionDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for CollectionDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send> Decode for CollectionDecoder<T> {
    type Output = Page<T>;

    fn decode(&self, body: &str) -> Result<Page<T>, Error> {
        if body.trim().is_empty() {
            return Ok(Page::default());
        }

        let envelope: CollectionEnvelope<T> = serde_json::from_str(body).map_err(|e| {
            ApiError::parse_with_body(format!("Invalid collection response: {}", e), body)
        })?;

        let mut page = Page::new(envelope.value);
        if let Some(link) = envelope.next_link {
            page = page.with_next_link(PagingToken::new(link));
        }
        if let Some(count) = envelope.count {
            page = page.with_total_count(count);
        }
        Ok(page)
    }
}

/// Decodes a single-entity response. An empty body decodes to `None`.
pub struct EntityDecoder<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityDecoder<T> {
    /// Creates a new entity decoder.
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for EntityDecoder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for EntityDecoder<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned + Send> Decode for EntityDecoder<T> {
    type Output = Option<T>;

    fn decode(&self, body: &str) -> Result<Option<T>, Error> {
        if body.trim().is_empty() {
            return Ok(None);
        }

        let entity = serde_json::from_str(body).map_err(|e| {
            ApiError::parse_with_body(format!("Invalid entity response: {}", e), body)
        })?;
        Ok(Some(entity))
    }
}

/// Returns the response body as untyped JSON. An empty body decodes to
/// `Null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawDecoder;

impl Decode for RawDecoder {
    type Output = serde_json::Value;

    fn decode(&self, body: &str) -> Result<serde_json::Value, Error> {
        if body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        serde_json::from_str(body)
            .map_err(|e| ApiError::parse_with_body(format!("Invalid JSON response: {}", e), body).into())
    }
}
