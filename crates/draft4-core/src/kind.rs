//! # JSON Type Classification
//!
//! Maps a decoded value onto the seven draft-4 type names. A number is an
//! `integer` when the decoder kept it in an integer slot (no fraction or
//! exponent in the source text) and a `number` otherwise. An `integer` also
//! satisfies a declared `number`; the reverse never holds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A draft-4 primitive type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    String,
    Number,
    Integer,
    Array,
    Object,
}

impl JsonType {
    /// All type names, in declaration order.
    pub const ALL: [JsonType; 7] = [
        JsonType::Null,
        JsonType::Boolean,
        JsonType::String,
        JsonType::Number,
        JsonType::Integer,
        JsonType::Array,
        JsonType::Object,
    ];

    /// Classify a decoded value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::String(_) => Self::String,
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Integer,
            Value::Number(_) => Self::Number,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Whether a value classified as `self` satisfies a declared `declared`.
    pub fn satisfies(self, declared: JsonType) -> bool {
        self == declared || (self == Self::Integer && declared == Self::Number)
    }

    /// The keyword spelling of this type.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::String => "string",
            Self::Number => "number",
            Self::Integer => "integer",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JsonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown type name '{s}'"))
    }
}
