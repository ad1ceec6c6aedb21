//! Query builder for a resource path and its query options.

use std::collections::BTreeSet;

use super::expand::Expand;
use super::expand::ExpandBuilder;
use super::expand::render_options;
use crate::error::ValidationError;
use crate::literal::ToLiteral;
use crate::literal::split;
use crate::model::Model;

/// The accumulated clauses of one query.
///
/// Rendering is a pure function of this state, so two states that compare
/// equal always render the same string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryState {
    /// Key segment, either a parenthesised predicate or a plain path segment.
    pub key: Option<String>,
    /// Navigation segments appended after the key.
    pub navigation: Vec<String>,
    pub filter: Option<String>,
    pub select: Vec<String>,
    pub expand: Vec<Expand>,
    pub order_by: Option<String>,
    pub top: Option<usize>,
    pub skip: Option<usize>,
    /// Request an inline `$count`.
    pub count: bool,
}

impl QueryState {
    /// Renders the query options, without the leading `?`.
    ///
    /// Clauses always appear as `$filter`, `$select`, `$expand`, `$orderby`,
    /// `$top`, `$skip`, `$count`, whatever order they were set in.
    pub fn render_options(&self) -> String {
        let mut options = render_options(
            self.filter.as_deref(),
            &self.select,
            &self.expand,
            self.order_by.as_deref(),
            self.top,
            self.skip,
        );
        if self.count {
            options.push("$count=true".to_string());
        }
        options.join("&")
    }
}

/// Fluent builder for a query against one resource root.
///
/// Single-valued clauses (`filter`, `orderby`, `top`, `skip`, `key`)
/// overwrite earlier values; `select` and `expand` accumulate. Fragments are
/// taken as already rendered and are neither escaped nor checked here; see
/// [`QueryBuilder::validate`] for an optional check against a [`Model`].
///
/// # Example
///
/// ```
/// use odata_lib::api::query::Expr;
/// use odata_lib::api::query::QueryBuilder;
///
/// let query = QueryBuilder::new("Accounts")
///     .top(10)
///     .select("a,b")
///     .filter(Expr::field("a").eq(5).and(Expr::field("b").starts_with("x")));
///
/// assert_eq!(
///     query.render(),
///     "Accounts?$filter=a eq 5 and startswith(b,'x')&$select=a,b&$top=10"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct QueryBuilder {
    root: String,
    state: QueryState,
}

impl QueryBuilder {
    /// Creates a builder for a resource root (an entity set, singleton or
    /// any path under the service root).
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            state: QueryState::default(),
        }
    }

    /// Returns the resource root.
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Returns the accumulated state.
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// Sets the maximum number of results.
    pub fn top(mut self, n: usize) -> Self {
        self.state.top = Some(n);
        self
    }

    /// Sets the number of results to skip.
    pub fn skip(mut self, n: usize) -> Self {
        self.state.skip = Some(n);
        self
    }

    /// Sets the `$filter` predicate.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.state.filter = Some(filter.into());
        self
    }

    /// Appends to the `$select` list.
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.state.select.push(select.into());
        self
    }

    /// Appends a flat `$expand` clause.
    pub fn expand(mut self, expand: impl Into<String>) -> Self {
        self.state.expand.push(Expand::Clause(expand.into()));
        self
    }

    /// Appends a nested expand with its own query options.
    ///
    /// # Example
    ///
    /// ```
    /// use odata_lib::api::query::QueryBuilder;
    ///
    /// let query = QueryBuilder::new("Customers")
    ///     .expand_with("Orders", |e| e.select("Total").top(3));
    /// assert_eq!(query.render(), "Customers?$expand=Orders($select=Total;$top=3)");
    /// ```
    pub fn expand_with<F>(mut self, navigation_property: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(ExpandBuilder) -> ExpandBuilder,
    {
        let nested = build(ExpandBuilder::new(navigation_property));
        self.state.expand.push(Expand::Path(nested));
        self
    }

    /// Sets the `$orderby` clause.
    pub fn orderby(mut self, order: impl Into<String>) -> Self {
        self.state.order_by = Some(order.into());
        self
    }

    /// Sets the key segment.
    ///
    /// A key starting with `(` is appended to the root directly
    /// (`Accounts(42)`); anything else becomes a path segment
    /// (`Accounts/42`).
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.state.key = Some(key.into());
        self
    }

    /// Sets the key segment to a parenthesised literal, e.g. `('ALFKI')`.
    pub fn key_value<T: ToLiteral>(self, value: T) -> Self {
        let key = format!("({})", value.to_literal());
        self.key(key)
    }

    /// Appends a navigation segment after the key.
    pub fn navigate(mut self, segment: impl Into<String>) -> Self {
        self.state.navigation.push(segment.into());
        self
    }

    /// Requests the total count alongside the results.
    pub fn count(mut self) -> Self {
        self.state.count = true;
        self
    }

    /// Replaces the whole state.
    pub fn with_state(mut self, state: QueryState) -> Self {
        self.state = state;
        self
    }

    /// Renders the resource path: root, key segment and navigation segments.
    pub fn path(&self) -> String {
        let mut path = self.root.clone();

        if let Some(key) = &self.state.key {
            if !key.starts_with('(') {
                path.push('/');
            }
            path.push_str(key);
        }

        for segment in &self.state.navigation {
            path.push('/');
            path.push_str(segment);
        }

        path
    }

    /// Renders the full query expression.
    pub fn render(&self) -> String {
        let path = self.path();
        let options = self.state.render_options();
        let rendered = if options.is_empty() {
            path
        } else {
            format!("{}?{}", path, options)
        };
        log::trace!("Rendered query: {}", rendered);
        rendered
    }

    /// Checks selected properties and expanded navigation properties against
    /// an entity type in `model`, including inherited members.
    ///
    /// Select items are checked by their first path segment; `*` and
    /// namespace-qualified items (operations, type casts) are skipped.
    pub fn validate(&self, model: &Model, entity_type: &str) -> Result<(), ValidationError> {
        if model.find_entity_type(entity_type).is_none() {
            return Err(ValidationError::unknown_type(entity_type));
        }

        // BTreeSet keeps the reported names sorted and deduplicated
        let mut unknown = BTreeSet::new();

        for item in self.state.select.iter().flat_map(|s| split(s, ",")) {
            let name = item.trim();
            let root = name.split('/').next().unwrap_or(name);
            if root.is_empty() || root == "*" || root.contains('.') {
                continue;
            }
            if model.find_property(entity_type, root).is_none()
                && model.find_navigation_property(entity_type, root).is_none()
            {
                unknown.insert(root.to_string());
            }
        }

        for name in self.state.expand.iter().flat_map(Expand::navigation_roots) {
            if name == "*" || name.contains('.') {
                continue;
            }
            if model.find_navigation_property(entity_type, name).is_none() {
                unknown.insert(name.to_string());
            }
        }

        if unknown.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(entity_type, unknown.into_iter().collect()))
        }
    }
}

impl From<QueryBuilder> for String {
    fn from(builder: QueryBuilder) -> Self {
        builder.render()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::query::Expr;
    use crate::api::query::OrderBy;
    use crate::model::metadata::EntityType;
    use crate::model::metadata::NavigationProperty;
    use crate::model::metadata::Property;

    #[test]
    fn test_empty_query_renders_root() {
        assert_eq!(QueryBuilder::new("Accounts").render(), "Accounts");
    }

    #[test]
    fn test_end_to_end_filter_select_top() {
        let query = QueryBuilder::new("Accounts")
            .filter(Expr::field("a").eq(5).and(Expr::field("b").starts_with("x")))
            .select("a,b")
            .top(10);

        let rendered = query.render();
        assert!(rendered.contains("$filter=a eq 5 and startswith(b,'x')"));
        let select = rendered.find("$select=a,b").unwrap();
        let top = rendered.find("$top=10").unwrap();
        assert!(select < top);
    }

    #[test]
    fn test_clause_order_is_independent_of_call_order() {
        let a = QueryBuilder::new("People")
            .skip(5)
            .top(10)
            .orderby("Name")
            .expand("Friends")
            .select("Name")
            .filter("Age gt 3")
            .count();
        let b = QueryBuilder::new("People")
            .count()
            .filter("Age gt 3")
            .select("Name")
            .expand("Friends")
            .orderby("Name")
            .top(10)
            .skip(5);

        let expected =
            "People?$filter=Age gt 3&$select=Name&$expand=Friends&$orderby=Name&$top=10&$skip=5&$count=true";
        assert_eq!(a.render(), expected);
        assert_eq!(b.render(), expected);
    }

    #[test]
    fn test_render_is_deterministic() {
        let query = QueryBuilder::new("People").top(1).select("a").key("(1)");
        assert_eq!(query.render(), query.render());
    }

    #[test]
    fn test_single_valued_clauses_overwrite() {
        let query = QueryBuilder::new("People")
            .top(1)
            .top(2)
            .skip(3)
            .skip(4)
            .filter("a eq 1")
            .filter("a eq 2")
            .orderby("a")
            .orderby(OrderBy::desc("b"));
        assert_eq!(
            query.render(),
            "People?$filter=a eq 2&$orderby=b desc&$top=2&$skip=4"
        );
    }

    #[test]
    fn test_select_and_expand_accumulate() {
        let query = QueryBuilder::new("People")
            .select("a")
            .select("b,c")
            .expand("Friends")
            .expand_with("Trips", |e| e.select("Name"));
        assert_eq!(
            query.render(),
            "People?$select=a,b,c&$expand=Friends,Trips($select=Name)"
        );
    }

    #[test]
    fn test_key_segment() {
        let query = QueryBuilder::new("People").key("('russell')");
        assert_eq!(query.path(), "People('russell')");

        let query = QueryBuilder::new("People").key("russell");
        assert_eq!(query.path(), "People/russell");

        let query = QueryBuilder::new("People").key("(1)").key("(2)");
        assert_eq!(query.path(), "People(2)");
    }

    #[test]
    fn test_key_value_and_navigation() {
        let query = QueryBuilder::new("People")
            .key_value("O'Neil")
            .navigate("Friends")
            .navigate("Trips")
            .top(1);
        assert_eq!(query.path(), "People('O''Neil')/Friends/Trips");
        assert_eq!(query.render(), "People('O''Neil')/Friends/Trips?$top=1");

        assert_eq!(QueryBuilder::new("Orders").key_value(42).path(), "Orders(42)");
    }

    #[test]
    fn test_into_string() {
        let rendered: String = QueryBuilder::new("People").top(3).into();
        assert_eq!(rendered, "People?$top=3");
    }

    fn model() -> Model {
        let mut model = Model::new();
        let schema = model.add_schema("Trip", "").unwrap();
        schema
            .add_entity_type(
                EntityType::new("Person")
                    .with_key("UserName")
                    .with_property(Property::new("UserName", "Edm.String"))
                    .with_navigation(NavigationProperty::collection("Friends", "Trip.Person")),
            )
            .unwrap();
        schema
            .add_entity_type(
                EntityType::new("Employee")
                    .with_base_type("Trip.Person")
                    .with_property(Property::new("Cost", "Edm.Int64")),
            )
            .unwrap();
        model
    }

    #[test]
    fn test_validate_accepts_known_and_inherited_names() {
        let model = model();
        let query = QueryBuilder::new("Employees")
            .select("UserName,Cost,*,Friends/UserName,Trip.GetFavorite")
            .expand("Friends($select=UserName)");
        assert!(query.validate(&model, "Trip.Employee").is_ok());
    }

    #[test]
    fn test_validate_reports_unknown_names() {
        let model = model();
        let query = QueryBuilder::new("People")
            .select("UserName, Age")
            .expand_with("Photos", |e| e)
            .expand("UserName");

        let err = query.validate(&model, "Trip.Person").unwrap_err();
        assert_eq!(err.type_name, "Trip.Person");
        assert_eq!(err.unknown, vec!["Age", "Photos", "UserName"]);
    }

    #[test]
    fn test_validate_unknown_type() {
        let model = model();
        let err = QueryBuilder::new("Things")
            .validate(&model, "Trip.Thing")
            .unwrap_err();
        assert_eq!(err.unknown, vec!["Trip.Thing"]);
    }
}
