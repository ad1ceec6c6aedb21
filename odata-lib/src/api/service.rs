//! Query execution coordinator

use std::sync::Arc;

use futures::Stream;
use futures::TryStreamExt;

use super::executor::QueryExecutor;
use super::query::ExpandBuilder;
use super::query::Page;
use super::query::PagingToken;
use super::query::QueryBuilder;
use crate::error::Error;
use crate::literal::ToLiteral;
use crate::model::Parameter;

/// Binds a [`QueryBuilder`] to a [`QueryExecutor`] and drives execution.
///
/// The chaining methods forward to the builder. Both collaborators are
/// optional: when one is missing, the `execute*` methods resolve with the
/// executor's default result and log a warning, or fail with
/// [`Error::ConfigurationMissing`] when [`strict`](Self::strict) is on.
///
/// A `ServiceQuery` does not serialize its own calls. Concurrent `execute*`
/// calls on one instance are independent requests with no ordering between
/// them.
///
/// # Example
///
/// ```ignore
/// use odata_lib::api::query::Expr;
///
/// let people = client
///     .query::<Person>("People")
///     .filter(Expr::field("FirstName").eq("Scott"))
///     .top(10)
///     .execute()
///     .await?;
///
/// for person in people.items() {
///     println!("{}", person.user_name);
/// }
/// ```
pub struct ServiceQuery<E> {
    executor: Option<Arc<E>>,
    builder: Option<QueryBuilder>,
    strict: bool,
}

impl<E> Default for ServiceQuery<E> {
    fn default() -> Self {
        Self {
            executor: None,
            builder: None,
            strict: false,
        }
    }
}

impl<E> Clone for ServiceQuery<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            builder: self.builder.clone(),
            strict: self.strict,
        }
    }
}

impl<E: QueryExecutor> ServiceQuery<E> {
    /// Creates a coordinator for a resource root.
    pub fn new(executor: Arc<E>, root: impl Into<String>) -> Self {
        Self {
            executor: Some(executor),
            builder: Some(QueryBuilder::new(root)),
            strict: false,
        }
    }

    /// Creates a coordinator with neither collaborator set.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    /// Sets or replaces the executor.
    pub fn with_executor(mut self, executor: Arc<E>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets or replaces the query builder.
    pub fn set_builder(mut self, builder: QueryBuilder) -> Self {
        self.builder = Some(builder);
        self
    }

    /// Fails with [`Error::ConfigurationMissing`] instead of resolving with
    /// a default result when a collaborator is missing.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Returns the query builder, if set.
    pub fn builder(&self) -> Option<&QueryBuilder> {
        self.builder.as_ref()
    }

    /// Renders the current query expression, if a builder is set.
    pub fn query_expression(&self) -> Option<String> {
        self.builder.as_ref().map(QueryBuilder::render)
    }

    fn map_builder(mut self, f: impl FnOnce(QueryBuilder) -> QueryBuilder) -> Self {
        self.builder = self.builder.map(f);
        self
    }

    /// See [`QueryBuilder::top`].
    pub fn top(self, n: usize) -> Self {
        self.map_builder(|b| b.top(n))
    }

    /// See [`QueryBuilder::skip`].
    pub fn skip(self, n: usize) -> Self {
        self.map_builder(|b| b.skip(n))
    }

    /// See [`QueryBuilder::filter`].
    pub fn filter(self, filter: impl Into<String>) -> Self {
        self.map_builder(|b| b.filter(filter))
    }

    /// See [`QueryBuilder::select`].
    pub fn select(self, select: impl Into<String>) -> Self {
        self.map_builder(|b| b.select(select))
    }

    /// See [`QueryBuilder::expand`].
    pub fn expand(self, expand: impl Into<String>) -> Self {
        self.map_builder(|b| b.expand(expand))
    }

    /// See [`QueryBuilder::expand_with`].
    pub fn expand_with<F>(self, navigation_property: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(ExpandBuilder) -> ExpandBuilder,
    {
        self.map_builder(|b| b.expand_with(navigation_property, build))
    }

    /// See [`QueryBuilder::orderby`].
    pub fn orderby(self, order: impl Into<String>) -> Self {
        self.map_builder(|b| b.orderby(order))
    }

    /// See [`QueryBuilder::key`].
    pub fn key(self, key: impl Into<String>) -> Self {
        self.map_builder(|b| b.key(key))
    }

    /// See [`QueryBuilder::key_value`].
    pub fn key_value<T: ToLiteral>(self, value: T) -> Self {
        self.map_builder(|b| b.key_value(value))
    }

    /// See [`QueryBuilder::navigate`].
    pub fn navigate(self, segment: impl Into<String>) -> Self {
        self.map_builder(|b| b.navigate(segment))
    }

    /// See [`QueryBuilder::count`].
    pub fn count(self) -> Self {
        self.map_builder(QueryBuilder::count)
    }

    fn missing(&self, what: &'static str) -> Result<(), Error> {
        if self.strict {
            return Err(Error::ConfigurationMissing(what));
        }
        log::warn!("{} is not configured, returning an empty result", what);
        Ok(())
    }

    fn executor_and_builder(&self) -> Result<Option<(&E, &QueryBuilder)>, Error> {
        let Some(executor) = self.executor.as_deref() else {
            self.missing("query executor")?;
            return Ok(None);
        };
        let Some(builder) = self.builder.as_ref() else {
            self.missing("query builder")?;
            return Ok(None);
        };
        Ok(Some((executor, builder)))
    }

    /// Renders the current query and executes it.
    pub async fn execute(&self) -> Result<E::Output, Error> {
        let Some((executor, builder)) = self.executor_and_builder()? else {
            return Ok(Default::default());
        };
        executor.execute_query(&builder.render()).await
    }

    /// Fetches the page `token` points at.
    ///
    /// The token is sent instead of the rendered query, but a builder must
    /// still be set, like for every other `execute*` call.
    pub async fn execute_paged(&self, token: &PagingToken) -> Result<E::Output, Error> {
        let Some((executor, _)) = self.executor_and_builder()? else {
            return Ok(Default::default());
        };
        executor.execute_paged_query(token).await
    }

    /// Invokes a function or action bound to the current resource path.
    ///
    /// Function parameters are rendered inline in the path; action
    /// parameters are sent as a JSON body.
    pub async fn execute_operation(
        &self,
        parameters: &[Parameter],
        is_function: bool,
    ) -> Result<E::Output, Error> {
        let Some((executor, builder)) = self.executor_and_builder()? else {
            return Ok(Default::default());
        };
        executor
            .execute_operation_query(&builder.render(), parameters, is_function)
            .await
    }
}

impl<E, T> ServiceQuery<E>
where
    E: QueryExecutor<Output = Page<T>>,
    T: Send,
{
    /// Streams every page of the result, following paging tokens until the
    /// service stops returning one.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use futures::TryStreamExt;
    ///
    /// let query = client.query::<Person>("People");
    /// let pages = query.pages();
    /// futures::pin_mut!(pages);
    /// while let Some(page) = pages.try_next().await? {
    ///     println!("{} people", page.len());
    /// }
    /// ```
    pub fn pages<'a>(&'a self) -> impl Stream<Item = Result<Page<T>, Error>> + Send + 'a
    where
        T: 'a,
    {
        async_stream::try_stream! {
            let mut page = self.execute().await?;
            loop {
                let next = page.next_link().cloned();
                yield page;
                match next {
                    Some(token) => page = self.execute_paged(&token).await?,
                    None => break,
                }
            }
        }
    }

    /// Collects the items of every page.
    pub async fn execute_all(&self) -> Result<Vec<T>, Error> {
        let pages = self.pages();
        futures::pin_mut!(pages);

        let mut items = Vec::new();
        while let Some(page) = pages.try_next().await? {
            items.extend(page.into_items());
        }
        Ok(items)
    }
}
