use std::fmt;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One input record handed over by the grid: column id to cell value.
pub type Row = serde_json::Map<String, Value>;

/// Reads `field` from a row, treating an empty field name as unbound.
#[must_use]
pub fn field_value<'a>(row: &'a Row, field: &str) -> Option<&'a Value> {
    if field.is_empty() {
        return None;
    }
    row.get(field)
}

/// Finite numeric view of a cell. Strings, booleans and non-finite numbers are
/// not numeric.
#[must_use]
pub fn as_finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| number.is_finite())
}

/// Plain string conversion of a cell, `undefined` for absent cells.
#[must_use]
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "undefined".to_owned(),
        Some(Value::Null) => "null".to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Hashable identity of a category cell used by discrete scales.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryKey {
    Null,
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
}

impl CategoryKey {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => number
                .as_f64()
                .map_or_else(|| Self::Text(number.to_string()), |n| Self::Number(OrderedFloat(n))),
            Value::String(text) => Self::Text(text.clone()),
            other => Self::Text(other.to_string()),
        }
    }
}

impl From<&str> for CategoryKey {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(number) => write!(f, "{}", number.0),
            Self::Text(text) => f.write_str(text),
        }
    }
}
