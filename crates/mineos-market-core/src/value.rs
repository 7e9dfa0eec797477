//! Decoded wire values.
//!
//! Every response body is decoded into a [`LuaValue`] tree before any key
//! normalization, coercion or schema validation happens. The tree is a plain
//! owned value: each request builds its own and drops it once the typed
//! result has been produced.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// String-keyed table entries. Key order carries no meaning on the wire.
pub type LuaMap = BTreeMap<String, LuaValue>;

/// A decoded Lua table literal.
#[derive(Debug, Clone, PartialEq)]
pub enum LuaValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    /// Table whose keys are exactly `1..=n`, or an empty table.
    Sequence(Vec<LuaValue>),
    /// Any other table. Non-string keys are rendered as strings.
    Mapping(LuaMap),
}

impl LuaValue {
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Boolean(_) => "boolean",
            Self::Integer(_) | Self::Float(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }

    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Float(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[LuaValue]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub const fn as_mapping(&self) -> Option<&LuaMap> {
        match self {
            Self::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Field lookup on a mapping. Absent keys and non-mappings both yield `None`.
    pub fn get(&self, key: &str) -> Option<&LuaValue> {
        self.as_mapping().and_then(|entries| entries.get(key))
    }

    /// Render a number the way the service's own clients print it:
    /// integral floats lose their fractional part.
    pub fn number_to_string(&self) -> Option<String> {
        match self {
            Self::Integer(value) => Some(value.to_string()),
            Self::Float(value) => Some(format_float(*value)),
            _ => None,
        }
    }
}

pub(crate) fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

impl Display for LuaValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nil => f.write_str("nil"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => f.write_str(&format_float(*value)),
            Self::String(value) => write!(f, "{value:?}"),
            Self::Sequence(items) => write!(f, "array({})", items.len()),
            Self::Mapping(entries) => write!(f, "object({})", entries.len()),
        }
    }
}

impl From<&str> for LuaValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for LuaValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for LuaValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<bool> for LuaValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<LuaValue> for serde_json::Value {
    fn from(value: LuaValue) -> Self {
        match value {
            LuaValue::Nil => Self::Null,
            LuaValue::Boolean(value) => Self::Bool(value),
            LuaValue::Integer(value) => Self::from(value),
            LuaValue::Float(value) => {
                serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
            }
            LuaValue::String(value) => Self::String(value),
            LuaValue::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            LuaValue::Mapping(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}
