use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A single field value. Serialized untagged, so `null`, `true`, `3.5` and
/// `"text"` map directly onto the variants.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Value {
    /// Null and empty text count as "no value"; `false` and `0` do not.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Numbers, plus text that parses as a number (raw input usually arrives as text).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => v.as_f64(),
            Self::Text(v) => v.trim().parse().ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(v) => f.write_str(v),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Non-finite floats have no number form and become `Null`.
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
