//! Filter expression builder.

use std::fmt;
use std::ops;

use crate::literal::ToLiteral;
use crate::literal::escape_string;

/// An accumulating `$filter` expression.
///
/// Every combinator consumes the expression and returns the extended one, so
/// a chain owns its text exclusively. Nothing is validated against metadata;
/// the text is sent to the service exactly as built.
///
/// Operands of the comparison combinators go through [`ToLiteral`]: numbers
/// render bare, strings are quoted, and another [`Expr`] renders as its raw
/// text (for comparing two properties).
///
/// # Example
///
/// ```
/// use odata_lib::api::query::Expr;
///
/// let filter = Expr::field("a").eq(5).and(Expr::field("b").starts_with("x"));
/// assert_eq!(filter.to_string(), "a eq 5 and startswith(b,'x')");
///
/// let filter = Expr::field("Name").to_lower().contains("corp");
/// assert_eq!(filter.to_string(), "contains(tolower(Name),'corp')");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Expr {
    text: String,
}

impl Expr {
    /// Creates an expression from raw text.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Creates an expression naming a property or property path.
    pub fn field(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// Returns the accumulated text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consumes the expression and returns its text.
    pub fn into_string(self) -> String {
        self.text
    }

    /// Returns `true` if nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    fn infix(self, keyword: &str, rhs: &str) -> Self {
        Self::new(format!("{} {} {}", self.text, keyword, rhs))
    }

    fn call(self, function: &str) -> Self {
        Self::new(format!("{}({})", function, self.text))
    }

    fn call_with(self, function: &str, argument: &str) -> Self {
        Self::new(format!("{}({},{})", function, self.text, escape_string(argument)))
    }

    // === Logical ===

    /// `self and rhs`
    pub fn and(self, rhs: impl Into<Expr>) -> Self {
        self.infix("and", rhs.into().as_str())
    }

    /// `self or rhs`
    pub fn or(self, rhs: impl Into<Expr>) -> Self {
        self.infix("or", rhs.into().as_str())
    }

    /// `not self`
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::new(format!("not {}", self.text))
    }

    /// Wraps the expression in parentheses.
    pub fn group(self) -> Self {
        Self::new(format!("({})", self.text))
    }

    // === Comparison ===

    /// `self eq value`
    pub fn eq<T: ToLiteral>(self, value: T) -> Self {
        self.infix("eq", &value.to_literal())
    }

    /// `self ne value`
    pub fn ne<T: ToLiteral>(self, value: T) -> Self {
        self.infix("ne", &value.to_literal())
    }

    /// `self ge value`
    pub fn ge<T: ToLiteral>(self, value: T) -> Self {
        self.infix("ge", &value.to_literal())
    }

    /// `self gt value`
    pub fn gt<T: ToLiteral>(self, value: T) -> Self {
        self.infix("gt", &value.to_literal())
    }

    /// `self le value`
    pub fn le<T: ToLiteral>(self, value: T) -> Self {
        self.infix("le", &value.to_literal())
    }

    /// `self lt value`
    pub fn lt<T: ToLiteral>(self, value: T) -> Self {
        self.infix("lt", &value.to_literal())
    }

    /// `self eq null`
    pub fn is_null(self) -> Self {
        self.infix("eq", "null")
    }

    /// `self ne null`
    pub fn is_not_null(self) -> Self {
        self.infix("ne", "null")
    }

    // === Lists ===

    /// `self,rhs`, used for select and expand lists.
    pub fn join(self, rhs: impl Into<Expr>) -> Self {
        Self::new(format!("{},{}", self.text, rhs.into().as_str()))
    }

    // === String functions ===

    /// `contains(self,'value')`
    pub fn contains(self, value: &str) -> Self {
        self.call_with("contains", value)
    }

    /// `concat(self,'value')`
    pub fn concat(self, value: &str) -> Self {
        self.call_with("concat", value)
    }

    /// `startswith(self,'value')`
    pub fn starts_with(self, value: &str) -> Self {
        self.call_with("startswith", value)
    }

    /// `endswith(self,'value')`
    pub fn ends_with(self, value: &str) -> Self {
        self.call_with("endswith", value)
    }

    /// `substring(self,'index')`
    pub fn substring(self, index: i32) -> Self {
        Self::new(format!("substring({},'{}')", self.text, index))
    }

    /// `substring(self,'index','length')`
    pub fn substring_len(self, index: i32, length: i32) -> Self {
        Self::new(format!("substring({},'{}','{}')", self.text, index, length))
    }

    /// `tolower(self)`
    pub fn to_lower(self) -> Self {
        self.call("tolower")
    }

    /// `toupper(self)`
    pub fn to_upper(self) -> Self {
        self.call("toupper")
    }

    /// `trim(self)`
    pub fn trim(self) -> Self {
        self.call("trim")
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl ToLiteral for Expr {
    fn to_literal(&self) -> String {
        self.text.clone()
    }
}

impl From<&str> for Expr {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Expr {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Expr> for String {
    fn from(expr: Expr) -> Self {
        expr.text
    }
}

impl ops::BitAnd for Expr {
    type Output = Expr;

    fn bitand(self, rhs: Expr) -> Expr {
        self.and(rhs)
    }
}

impl ops::BitOr for Expr {
    type Output = Expr;

    fn bitor(self, rhs: Expr) -> Expr {
        self.or(rhs)
    }
}

impl ops::Not for Expr {
    type Output = Expr;

    fn not(self) -> Expr {
        Expr::not(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparisons() {
        assert_eq!(Expr::field("a").eq(5).to_string(), "a eq 5");
        assert_eq!(Expr::field("a").ne(5).to_string(), "a ne 5");
        assert_eq!(Expr::field("a").ge(1.5).to_string(), "a ge 1.5");
        assert_eq!(Expr::field("a").gt(-0.0).to_string(), "a gt -0.0");
        assert_eq!(Expr::field("a").le(10u64).to_string(), "a le 10");
        assert_eq!(Expr::field("a").lt(true).to_string(), "a lt true");
        assert_eq!(Expr::field("Name").eq("O'Brien").to_string(), "Name eq 'O''Brien'");
    }

    #[test]
    fn test_field_to_field_comparison() {
        let filter = Expr::field("Price").gt(Expr::field("Cost"));
        assert_eq!(filter.to_string(), "Price gt Cost");
    }

    #[test]
    fn test_logical() {
        let filter = Expr::field("a").eq(5).and(Expr::field("b").starts_with("x"));
        assert_eq!(filter.to_string(), "a eq 5 and startswith(b,'x')");

        let filter = Expr::field("a").eq(1).or("b eq 2");
        assert_eq!(filter.to_string(), "a eq 1 or b eq 2");

        assert_eq!(Expr::field("Active").not().to_string(), "not Active");
    }

    #[test]
    fn test_operator_sugar() {
        let filter = Expr::field("a").eq(1) & Expr::field("b").eq(2) | Expr::field("c").eq(3);
        assert_eq!(filter.to_string(), "a eq 1 and b eq 2 or c eq 3");

        let filter = !Expr::field("a").eq(1).group();
        assert_eq!(filter.to_string(), "not (a eq 1)");
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(Expr::field("n").contains("x").to_string(), "contains(n,'x')");
        assert_eq!(Expr::field("n").concat("x").to_string(), "concat(n,'x')");
        assert_eq!(Expr::field("n").ends_with("x").to_string(), "endswith(n,'x')");
        assert_eq!(Expr::field("n").to_lower().to_string(), "tolower(n)");
        assert_eq!(Expr::field("n").to_upper().to_string(), "toupper(n)");
        assert_eq!(Expr::field("n").trim().to_string(), "trim(n)");
        assert_eq!(Expr::field("n").substring(1).to_string(), "substring(n,'1')");
        assert_eq!(
            Expr::field("n").substring_len(1, 2).to_string(),
            "substring(n,'1','2')"
        );
    }

    #[test]
    fn test_function_arguments_are_requoted() {
        assert_eq!(
            Expr::field("n").starts_with("'x'").to_string(),
            "startswith(n,'x')"
        );
    }

    #[test]
    fn test_nested_calls_and_null() {
        let filter = Expr::field("Name").trim().to_upper().eq("ACME");
        assert_eq!(filter.to_string(), "toupper(trim(Name)) eq 'ACME'");
        assert_eq!(Expr::field("p").is_null().to_string(), "p eq null");
        assert_eq!(Expr::field("p").is_not_null().to_string(), "p ne null");
    }

    #[test]
    fn test_join() {
        let select = Expr::field("a").join("b").join(Expr::field("c"));
        assert_eq!(select.to_string(), "a,b,c");
        assert_eq!(String::from(select), "a,b,c");
    }

    #[test]
    fn test_independent_chains_do_not_share_state() {
        let base = Expr::field("a").eq(1);
        let left = base.clone().and("b eq 2");
        let right = base.or("c eq 3");
        assert_eq!(left.as_str(), "a eq 1 and b eq 2");
        assert_eq!(right.as_str(), "a eq 1 or c eq 3");
    }
}
