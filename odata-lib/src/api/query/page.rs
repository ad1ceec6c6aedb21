//! Result pages and continuation tokens.

use std::fmt;

/// An opaque continuation token issued by the service.
///
/// The token is the `@odata.nextLink` value of a response. It is passed back
/// verbatim to fetch the next page and never parsed or modified.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PagingToken(String);

impl PagingToken {
    /// Wraps a service-issued token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PagingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PagingToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl From<&str> for PagingToken {
    fn from(token: &str) -> Self {
        Self(token.to_string())
    }
}

/// A page of query results with pagination information.
///
/// # Example
///
/// ```ignore
/// let mut page = query.execute().await?;
/// loop {
///     for account in page.items() {
///         println!("{:?}", account);
///     }
///     match page.next_link() {
///         Some(token) => page = query.execute_paged(token).await?,
///         None => break,
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Page<T> {
    items: Vec<T>,
    next_link: Option<PagingToken>,
    total_count: Option<usize>,
}

impl<T> Page<T> {
    /// Creates a new page with items and no continuation.
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items,
            next_link: None,
            total_count: None,
        }
    }

    /// Sets the continuation token for the next page.
    pub fn with_next_link(mut self, next_link: impl Into<PagingToken>) -> Self {
        self.next_link = Some(next_link.into());
        self
    }

    /// Sets the total item count.
    pub fn with_total_count(mut self, count: usize) -> Self {
        self.total_count = Some(count);
        self
    }

    /// Returns the items in this page.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page and returns the items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the continuation token, if more results are available.
    pub fn next_link(&self) -> Option<&PagingToken> {
        self.next_link.as_ref()
    }

    /// Returns the total item count, if it was requested with `$count=true`.
    pub fn total_count(&self) -> Option<usize> {
        self.total_count
    }

    /// Returns `true` if this page has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items in this page.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are more pages available.
    pub fn has_more(&self) -> bool {
        self.next_link.is_some()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
