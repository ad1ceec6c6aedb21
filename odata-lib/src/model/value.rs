//! Value enum for typed primitive values

use chrono::DateTime;
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::literal::ToLiteral;

/// A typed primitive value.
///
/// Values render to URI literals through [`ToLiteral`] (for filters, keys and
/// function parameters) and to JSON through [`Value::to_json`] (for action
/// bodies).
///
/// # Type Mapping
///
/// | Edm Type | Rust Variant |
/// |----------|--------------|
/// | null | `Null` |
/// | Edm.Boolean | `Bool` |
/// | Edm.Int32 | `Int` |
/// | Edm.Int64 | `Long` |
/// | Edm.Double | `Double` |
/// | Edm.Decimal | `Decimal` |
/// | Edm.String | `String` |
/// | Edm.Guid | `Guid` |
/// | Edm.DateTimeOffset | `DateTimeOffset` |
///
/// # Example
///
/// ```
/// use odata_lib::model::Value;
///
/// let name = Value::from("Contoso");
/// let revenue = Value::from(1_000_000i64);
/// let active = Value::from(true);
/// let empty = Value::Null;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 64-bit floating point.
    Double(f64),
    /// Arbitrary precision decimal.
    Decimal(Decimal),
    /// String value.
    String(String),
    /// GUID value.
    Guid(Uuid),
    /// Date and time with offset.
    DateTimeOffset(DateTime<Utc>),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the Edm type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "Edm.Boolean",
            Value::Int(_) => "Edm.Int32",
            Value::Long(_) => "Edm.Int64",
            Value::Double(_) => "Edm.Double",
            Value::Decimal(_) => "Edm.Decimal",
            Value::String(_) => "Edm.String",
            Value::Guid(_) => "Edm.Guid",
            Value::DateTimeOffset(_) => "Edm.DateTimeOffset",
        }
    }

    /// Converts this value to JSON for a request body.
    ///
    /// Non-finite doubles have no JSON number form and are sent as the
    /// protocol's string spellings (`NaN`, `INF`, `-INF`).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::from(*n),
            Value::Long(n) => serde_json::Value::from(*n),
            Value::Double(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or_else(|| serde_json::Value::String(n.to_literal())),
            Value::Decimal(d) => serde_json::Value::String(d.to_string()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Guid(g) => serde_json::Value::String(g.to_string()),
            Value::DateTimeOffset(dt) => serde_json::Value::String(dt.to_literal()),
        }
    }
}

impl ToLiteral for Value {
    fn to_literal(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_literal(),
            Value::Int(n) => n.to_literal(),
            Value::Long(n) => n.to_literal(),
            Value::Double(n) => n.to_literal(),
            Value::Decimal(d) => d.to_literal(),
            Value::String(s) => s.to_literal(),
            Value::Guid(g) => g.to_literal(),
            Value::DateTimeOffset(dt) => dt.to_literal(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Guid(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTimeOffset(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}
