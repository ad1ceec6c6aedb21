//! Literal codec for the OData URI grammar.
//!
//! Everything that ends up verbatim in a request URL goes through here:
//! quote handling for string literals, delimiter splitting for qualified
//! names, the relative-reference test used when resolving links against a
//! service root, and exact decimal rendering of binary floats.

use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Fractional digits used by [`format_decimal_default`].
pub const DEFAULT_DECIMAL_PRECISION: usize = 1;

/// Most fractional digits the exact expansion of any finite `f64` can have
/// (the smallest subnormal is 2^-1074).
const MAX_EXACT_FRACTION_DIGITS: usize = 1074;

const QUOTES: [char; 2] = ['"', '\''];

/// Removes one enclosing quote character from each end of `s`.
///
/// The leading and trailing quotes are handled independently, so a value
/// with only one of them is still stripped on that side.
///
/// # Example
///
/// ```
/// use odata_lib::literal::strip_quote;
///
/// assert_eq!(strip_quote("\"121232123\""), "121232123");
/// assert_eq!(strip_quote("'abc"), "abc");
/// assert_eq!(strip_quote("plain"), "plain");
/// ```
pub fn strip_quote(s: &str) -> &str {
    if s == "\"\"" || s == "''" {
        return "";
    }
    let s = s.strip_prefix(QUOTES).unwrap_or(s);
    s.strip_suffix(QUOTES).unwrap_or(s)
}

/// Splits `s` on every non-overlapping occurrence of `delimiter`.
///
/// Empty segments are kept. An empty delimiter, an empty input, or a
/// delimiter that never occurs yields a single segment holding `s`.
///
/// # Example
///
/// ```
/// use odata_lib::literal::split;
///
/// assert_eq!(split("Namespace.Type", "."), vec!["Namespace", "Type"]);
/// assert_eq!(split("..a..", ".."), vec!["", "a", ""]);
/// assert_eq!(split("x", ""), vec!["x"]);
/// ```
pub fn split<'a>(s: &'a str, delimiter: &str) -> Vec<&'a str> {
    if delimiter.is_empty() || s.is_empty() || delimiter.len() > s.len() {
        return vec![s];
    }

    let mut segments = Vec::new();
    let mut start = 0;
    while let Some(offset) = s[start..].find(delimiter) {
        segments.push(&s[start..start + offset]);
        // advance past the whole match so overlapping runs are not re-consumed
        start += offset + delimiter.len();
    }
    segments.push(&s[start..]);
    segments
}

/// Returns `true` if `candidate` should be resolved relative to `root`.
///
/// The test is a case-sensitive prefix comparison: a candidate that already
/// starts with `root` is an absolute reference under it. Empty inputs are
/// never relative.
pub fn is_relative_reference(root: &str, candidate: &str) -> bool {
    if root.is_empty() || candidate.is_empty() {
        return false;
    }
    !candidate.starts_with(root)
}

/// Renders `value` as a decimal string from the exact binary value it holds.
///
/// With `precision == 0` no decimal point is emitted. Otherwise the value is
/// rounded to `precision` fractional digits and trailing zeros are removed,
/// keeping at least one fractional digit. The sign of zero is preserved.
///
/// Magnitudes past the mantissa's precision print every digit of the stored
/// binary value, which can differ from what other platforms' runtimes print
/// for the same literal.
///
/// # Example
///
/// ```
/// use odata_lib::literal::format_decimal;
///
/// assert_eq!(format_decimal(212.1234, 4), "212.1234");
/// assert_eq!(format_decimal(-4212.11, 9), "-4212.11");
/// assert_eq!(format_decimal(-0.0, 1), "-0.0");
/// assert_eq!(format_decimal(-4212.1111222323, 0), "-4212");
/// ```
pub fn format_decimal(value: f64, precision: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_negative() { "-INF" } else { "INF" }.to_string();
    }

    let sign = if value.is_sign_negative() { "-" } else { "" };
    // digits past the exact expansion are all zero and get trimmed below
    let precision = precision.min(MAX_EXACT_FRACTION_DIGITS);
    let mut digits = format!("{:.*}", precision, value.abs());

    if precision > 0 {
        let trimmed = digits.trim_end_matches('0');
        let keep = if trimmed.ends_with('.') {
            trimmed.len() + 1
        } else {
            trimmed.len()
        };
        digits.truncate(keep);
    }

    format!("{}{}", sign, digits)
}

/// [`format_decimal`] with [`DEFAULT_DECIMAL_PRECISION`].
pub fn format_decimal_default(value: f64) -> String {
    format_decimal(value, DEFAULT_DECIMAL_PRECISION)
}

/// Renders a string literal: quotes stripped, embedded `'` doubled, then
/// wrapped in single quotes.
///
/// # Example
///
/// ```
/// use odata_lib::literal::escape_string;
///
/// assert_eq!(escape_string("O'Brien"), "'O''Brien'");
/// assert_eq!(escape_string("'quoted'"), "'quoted'");
/// ```
pub fn escape_string(s: &str) -> String {
    format!("'{}'", strip_quote(s).replace('\'', "''"))
}

/// Number of fractional digits in the shortest round-trip rendering of `value`.
fn shortest_fraction_digits(value: f64) -> usize {
    let shortest = value.abs().to_string();
    shortest
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}

/// A value that can be rendered as an operand in a filter expression.
///
/// Implementations produce text that is pasted verbatim into the URI, so
/// string-like types must quote themselves and numeric types must follow
/// the protocol's literal grammar.
pub trait ToLiteral {
    /// Renders this value as a protocol literal.
    fn to_literal(&self) -> String;
}

macro_rules! integer_literal {
    ($($ty:ty),*) => {
        $(
            impl ToLiteral for $ty {
                fn to_literal(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

integer_literal!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl ToLiteral for f64 {
    fn to_literal(&self) -> String {
        let precision = shortest_fraction_digits(*self).max(DEFAULT_DECIMAL_PRECISION);
        format_decimal(*self, precision)
    }
}

impl ToLiteral for f32 {
    fn to_literal(&self) -> String {
        // widen through the shortest decimal form so 0.1f32 stays 0.1
        let widened = self.to_string().parse::<f64>().unwrap_or(f64::from(*self));
        widened.to_literal()
    }
}

impl ToLiteral for bool {
    fn to_literal(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl ToLiteral for str {
    fn to_literal(&self) -> String {
        escape_string(self)
    }
}

impl ToLiteral for String {
    fn to_literal(&self) -> String {
        escape_string(self)
    }
}

impl ToLiteral for Uuid {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl ToLiteral for DateTime<Utc> {
    fn to_literal(&self) -> String {
        self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl ToLiteral for Decimal {
    fn to_literal(&self) -> String {
        self.to_string()
    }
}

impl<T: ToLiteral> ToLiteral for Option<T> {
    fn to_literal(&self) -> String {
        match self {
            Some(value) => value.to_literal(),
            None => "null".to_string(),
        }
    }
}

impl<T: ToLiteral + ?Sized> ToLiteral for &T {
    fn to_literal(&self) -> String {
        (**self).to_literal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quote() {
        assert_eq!(strip_quote(""), "");
        assert_eq!(strip_quote("\"\""), "");
        assert_eq!(strip_quote("''"), "");
        assert_eq!(strip_quote("\"121232123\""), "121232123");
        assert_eq!(strip_quote("121232123"), "121232123");
        assert_eq!(strip_quote("\"121232123"), "121232123");
        assert_eq!(strip_quote("121232123\""), "121232123");
        assert_eq!(strip_quote("\""), "");
    }

    #[test]
    fn test_split_counts() {
        assert_eq!(split("23123.23232.32323", ".").len(), 3);
        assert_eq!(split("..adf..ad..fa..dfdas..", "..").len(), 6);
        assert_eq!(split("...adf..ad....fa..dfdas...", "..").len(), 7);
        assert_eq!(split("...adf..ad....fa..dfdas...f", "f").len(), 5);
    }

    #[test]
    fn test_split_overlapping_delimiter() {
        assert_eq!(
            split("...adf..ad....fa..dfdas...", ".."),
            vec!["", ".adf", "ad", "", "fa", "dfdas", "."]
        );
    }

    #[test]
    fn test_split_degenerate_inputs() {
        assert_eq!(split("x", ""), vec!["x"]);
        assert_eq!(split("", ".."), vec![""]);
        assert_eq!(split("", ""), vec![""]);
        assert_eq!(split("adfadfadfdas", ".."), vec!["adfadfadfdas"]);

        let source = "...adf..ad....fa..dfdas...f";
        assert_eq!(split(source, source), vec!["", ""]);

        let longer = "...adf..ad....fa..dfdas...fdfdfdfdf";
        assert_eq!(split(source, longer), vec![source]);
    }

    #[test]
    fn test_is_relative_reference() {
        let root = "http://odatae2etest.azurewebsites.net/cpptest/DefaultService";

        assert!(!is_relative_reference("", ""));
        assert!(!is_relative_reference("", "Accounts"));
        assert!(!is_relative_reference(root, ""));
        assert!(!is_relative_reference(root, &format!("{}/Accounts", root)));
        assert!(is_relative_reference(
            "http://http://odatae2etest.azurewebsites.net/cpptest/DefaultService",
            "http"
        ));
    }

    #[test]
    fn test_is_relative_reference_is_case_sensitive() {
        let root = "http://host/Service";
        assert!(is_relative_reference(root, "HTTP://HOST/Service/Accounts"));
    }

    #[test]
    fn test_format_decimal_zero_sign() {
        assert_eq!(format_decimal_default(0.0), "0.0");
        assert_eq!(format_decimal_default(-0.0), "-0.0");
    }

    #[test]
    fn test_format_decimal_precision() {
        assert_eq!(format_decimal(212.1234, 4), "212.1234");
        assert_eq!(format_decimal(123123123.1111222323, 8), "123123123.11112224");
        assert_eq!(format_decimal(-4212.1111222323, 13), "-4212.1111222322997");
        assert_eq!(format_decimal(-4212.1111222323, 0), "-4212");
        assert_eq!(format_decimal(-4212.11, 9), "-4212.11");
        assert_eq!(format_decimal(-12345.7674567611117999, 12), "-12345.767456761112");
    }

    #[test]
    fn test_format_decimal_exact_expansion() {
        assert_eq!(
            format_decimal(-12123123123213124212.11, 1),
            "-12123123123213123584.0"
        );
        assert_eq!(format_decimal(1234567891234567.7674567611117999, 1), "1234567891234567.8");
    }

    #[test]
    fn test_format_decimal_huge_precision() {
        assert_eq!(format_decimal(1.5, 70_000), "1.5");
        assert_eq!(format_decimal(-0.0, usize::MAX), "-0.0");
        assert_eq!(format_decimal(0.1, 100_000), format_decimal(0.1, 1074));

        let tiny = f64::from_bits(1);
        let expanded = format_decimal(tiny, 5_000);
        assert_eq!(expanded.len(), "0.".len() + 1074);
        assert!(expanded.ends_with('5'));
    }

    #[test]
    fn test_format_decimal_non_finite() {
        assert_eq!(format_decimal(f64::NAN, 2), "NaN");
        assert_eq!(format_decimal(f64::INFINITY, 2), "INF");
        assert_eq!(format_decimal(f64::NEG_INFINITY, 2), "-INF");
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("x"), "'x'");
        assert_eq!(escape_string("O'Brien"), "'O''Brien'");
        assert_eq!(escape_string("\"x\""), "'x'");
    }

    #[test]
    fn test_literals() {
        assert_eq!(5i32.to_literal(), "5");
        assert_eq!(3.25f64.to_literal(), "3.25");
        assert_eq!(10.0f64.to_literal(), "10.0");
        assert_eq!((-0.0f64).to_literal(), "-0.0");
        assert_eq!(0.1f32.to_literal(), "0.1");
        assert_eq!(true.to_literal(), "true");
        assert_eq!("Contoso".to_literal(), "'Contoso'");
        assert_eq!(Option::<i32>::None.to_literal(), "null");
        assert_eq!(Some(7u8).to_literal(), "7");
    }
}
