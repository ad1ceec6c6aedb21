//! `$expand` builder for nested navigation properties.

use std::fmt;

/// One entry of an `$expand` clause.
#[derive(Debug, Clone, PartialEq)]
pub enum Expand {
    /// A pre-rendered clause, sent as-is (e.g. `Orders,Customer`).
    Clause(String),
    /// A navigation property with its own nested query options.
    Path(ExpandBuilder),
}

impl Expand {
    /// Returns the navigation property names this entry expands.
    ///
    /// For a raw clause, each top-level comma-separated item contributes the
    /// name before any `(`, `/` or `;`.
    pub fn navigation_roots(&self) -> Vec<&str> {
        match self {
            Expand::Clause(clause) => top_level_items(clause)
                .into_iter()
                .map(|item| item.split(['(', '/', ';']).next().unwrap_or(item).trim())
                .filter(|name| !name.is_empty())
                .collect(),
            Expand::Path(path) => vec![path.navigation_property()],
        }
    }
}

impl fmt::Display for Expand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expand::Clause(clause) => f.write_str(clause),
            Expand::Path(path) => f.write_str(&path.to_odata()),
        }
    }
}

/// Builder for an expanded navigation property with nested query options.
///
/// Nested options are rendered in the same fixed order as a top-level query
/// and separated by `;`.
///
/// # Example
///
/// ```
/// use odata_lib::api::query::ExpandBuilder;
/// use odata_lib::api::query::Expr;
///
/// let expand = ExpandBuilder::new("Orders")
///     .select("OrderID,Total")
///     .filter(Expr::field("Total").gt(100))
///     .top(5);
/// assert_eq!(
///     expand.to_odata(),
///     "Orders($filter=Total gt 100;$select=OrderID,Total;$top=5)"
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandBuilder {
    navigation_property: String,
    filter: Option<String>,
    select: Vec<String>,
    expands: Vec<Expand>,
    order_by: Option<String>,
    top: Option<usize>,
    skip: Option<usize>,
}

impl ExpandBuilder {
    /// Creates a new expand builder for a navigation property.
    pub fn new(navigation_property: impl Into<String>) -> Self {
        Self {
            navigation_property: navigation_property.into(),
            filter: None,
            select: Vec::new(),
            expands: Vec::new(),
            order_by: None,
            top: None,
            skip: None,
        }
    }

    /// Sets the filter applied to the expanded entities.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Appends to the selected properties of the expanded entities.
    pub fn select(mut self, select: impl Into<String>) -> Self {
        self.select.push(select.into());
        self
    }

    /// Sets the ordering of the expanded entities.
    pub fn order_by(mut self, order: impl Into<String>) -> Self {
        self.order_by = Some(order.into());
        self
    }

    /// Limits the number of expanded entities.
    pub fn top(mut self, n: usize) -> Self {
        self.top = Some(n);
        self
    }

    /// Skips expanded entities.
    pub fn skip(mut self, n: usize) -> Self {
        self.skip = Some(n);
        self
    }

    /// Adds a nested expand within this expand.
    ///
    /// # Example
    ///
    /// ```
    /// use odata_lib::api::query::ExpandBuilder;
    ///
    /// let expand = ExpandBuilder::new("Orders")
    ///     .expand("Items", |e| e.select("Sku"));
    /// assert_eq!(expand.to_odata(), "Orders($expand=Items($select=Sku))");
    /// ```
    pub fn expand<F>(mut self, navigation_property: impl Into<String>, build: F) -> Self
    where
        F: FnOnce(ExpandBuilder) -> ExpandBuilder,
    {
        let nested = build(ExpandBuilder::new(navigation_property));
        self.expands.push(Expand::Path(nested));
        self
    }

    /// Adds a pre-rendered nested expand clause.
    pub fn expand_clause(mut self, clause: impl Into<String>) -> Self {
        self.expands.push(Expand::Clause(clause.into()));
        self
    }

    /// Returns the navigation property name.
    pub fn navigation_property(&self) -> &str {
        &self.navigation_property
    }

    /// Renders this expand as an `$expand` item.
    pub fn to_odata(&self) -> String {
        let options = render_options(
            self.filter.as_deref(),
            &self.select,
            &self.expands,
            self.order_by.as_deref(),
            self.top,
            self.skip,
        );

        if options.is_empty() {
            self.navigation_property.clone()
        } else {
            format!("{}({})", self.navigation_property, options.join(";"))
        }
    }
}

/// Renders query options in the fixed clause order shared by top-level
/// queries and nested expands.
pub(crate) fn render_options(
    filter: Option<&str>,
    select: &[String],
    expands: &[Expand],
    order_by: Option<&str>,
    top: Option<usize>,
    skip: Option<usize>,
) -> Vec<String> {
    let mut options = Vec::new();

    if let Some(filter) = filter {
        options.push(format!("$filter={}", filter));
    }

    if !select.is_empty() {
        options.push(format!("$select={}", select.join(",")));
    }

    if !expands.is_empty() {
        let items: Vec<_> = expands.iter().map(Expand::to_string).collect();
        options.push(format!("$expand={}", items.join(",")));
    }

    if let Some(order_by) = order_by {
        options.push(format!("$orderby={}", order_by));
    }

    if let Some(top) = top {
        options.push(format!("$top={}", top));
    }

    if let Some(skip) = skip {
        options.push(format!("$skip={}", skip));
    }

    options
}

/// Splits on commas that are not nested inside parentheses.
fn top_level_items(clause: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in clause.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                items.push(&clause[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    items.push(&clause[start..]);
    items
}
