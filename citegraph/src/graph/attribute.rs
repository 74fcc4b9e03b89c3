//! Attribute values carried by nodes and edges
//!
//! Attributes are dynamically typed in the extracted citation data, so they are
//! modelled as a closed sum type. Merge logic matches on the variant instead of
//! inspecting types at runtime.

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Attribute map of a node or edge, ordered by key
pub type Attributes = BTreeMap<String, AttributeValue>;

/// A single attribute value
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub enum AttributeValue {
    Int(i64),
    Float32(f32),
    Float64(f64),
    Str(String),
    IntList(Vec<i64>),
    Float32List(Vec<f32>),
    Float64List(Vec<f64>),
    StrList(Vec<String>),
}

/// Scalar type shared by a value and the lists it can be promoted into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFamily {
    Int,
    Float32,
    Float64,
    Str,
}

impl AttributeValue {
    /// Name of the variant, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Str(_) => "string",
            Self::IntList(_) => "int list",
            Self::Float32List(_) => "float32 list",
            Self::Float64List(_) => "float64 list",
            Self::StrList(_) => "string list",
        }
    }

    /// The scalar family of this value
    pub fn family(&self) -> ValueFamily {
        match self {
            Self::Int(_) | Self::IntList(_) => ValueFamily::Int,
            Self::Float32(_) | Self::Float32List(_) => ValueFamily::Float32,
            Self::Float64(_) | Self::Float64List(_) => ValueFamily::Float64,
            Self::Str(_) | Self::StrList(_) => ValueFamily::Str,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self,
            Self::IntList(_) | Self::Float32List(_) | Self::Float64List(_) | Self::StrList(_)
        )
    }

    /// True for a list with no elements, whatever its element type
    pub fn is_empty_list(&self) -> bool {
        match self {
            Self::IntList(v) => v.is_empty(),
            Self::Float32List(v) => v.is_empty(),
            Self::Float64List(v) => v.is_empty(),
            Self::StrList(v) => v.is_empty(),
            _ => false,
        }
    }

    /// False if any float in the value is NaN or infinite
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float32(v) => v.is_finite(),
            Self::Float64(v) => v.is_finite(),
            Self::Float32List(v) => v.iter().all(|x| x.is_finite()),
            Self::Float64List(v) => v.iter().all(|x| x.is_finite()),
            Self::Int(_) | Self::Str(_) | Self::IntList(_) | Self::StrList(_) => true,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Self::Float32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(v) => Some(v),
            _ => None,
        }
    }

    /// Promote to an int list. Scalars become one-element lists.
    pub fn to_int_list(&self) -> Option<Vec<i64>> {
        match self {
            Self::Int(v) => Some(vec![*v]),
            Self::IntList(v) => Some(v.clone()),
            _ if self.is_empty_list() => Some(Vec::new()),
            _ => None,
        }
    }

    /// Promote to a float32 list. Scalars become one-element lists.
    pub fn to_f32_list(&self) -> Option<Vec<f32>> {
        match self {
            Self::Float32(v) => Some(vec![*v]),
            Self::Float32List(v) => Some(v.clone()),
            _ if self.is_empty_list() => Some(Vec::new()),
            _ => None,
        }
    }

    /// Promote to a float64 list. Scalars become one-element lists.
    pub fn to_f64_list(&self) -> Option<Vec<f64>> {
        match self {
            Self::Float64(v) => Some(vec![*v]),
            Self::Float64List(v) => Some(v.clone()),
            _ if self.is_empty_list() => Some(Vec::new()),
            _ => None,
        }
    }

    /// Promote to a string list. Scalars become one-element lists.
    pub fn to_str_list(&self) -> Option<Vec<String>> {
        match self {
            Self::Str(v) => Some(vec![v.clone()]),
            Self::StrList(v) => Some(v.clone()),
            _ if self.is_empty_list() => Some(Vec::new()),
            _ => None,
        }
    }
}

/// Merge `incoming` into `existing` with the insertion rule: two ints are
/// summed, anything else is overwritten by the incoming value.
pub fn merge_additive(existing: &mut Attributes, incoming: Attributes) {
    for (key, value) in incoming {
        match (existing.get_mut(&key), &value) {
            (Some(AttributeValue::Int(current)), AttributeValue::Int(added)) => {
                *current = current.saturating_add(*added);
            }
            _ => {
                existing.insert(key, value);
            }
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Str(v) => write!(f, "{v:?}"),
            Self::IntList(v) => write!(f, "{v:?}"),
            Self::Float32List(v) => write!(f, "{v:?}"),
            Self::Float64List(v) => write!(f, "{v:?}"),
            Self::StrList(v) => write!(f, "{v:?}"),
        }
    }
}

/// JSON has no representation for NaN or infinities.
impl Serialize for AttributeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_finite() {
            return Err(S::Error::custom(format!(
                "non-finite {} attribute cannot be serialized: {self}",
                self.type_name()
            )));
        }

        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float32(v) => serializer.serialize_f32(*v),
            Self::Float64(v) => serializer.serialize_f64(*v),
            Self::Str(v) => serializer.serialize_str(v),
            Self::IntList(v) => v.serialize(serializer),
            Self::Float32List(v) => v.serialize(serializer),
            Self::Float64List(v) => v.serialize(serializer),
            Self::StrList(v) => v.serialize(serializer),
        }
    }
}

/// Error returned when a JSON value has no attribute representation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unsupported attribute value: {0}")]
pub struct UnsupportedValue(pub String);

impl TryFrom<Value> for AttributeValue {
    type Error = UnsupportedValue;

    /// Integers map to `Int`, every other number to `Float64`. Arrays must be
    /// homogeneous; arrays mixing ints and floats widen to `Float64List`, and
    /// an empty array becomes an empty `StrList`.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => n
                    .as_f64()
                    .map(Self::Float64)
                    .ok_or_else(|| UnsupportedValue(n.to_string())),
            },
            Value::String(s) => Ok(Self::Str(s)),
            Value::Array(items) => list_from_json(items),
            other => Err(UnsupportedValue(other.to_string())),
        }
    }
}

fn list_from_json(items: Vec<Value>) -> Result<AttributeValue, UnsupportedValue> {
    if items.is_empty() {
        return Ok(AttributeValue::StrList(Vec::new()));
    }

    if items.iter().all(Value::is_string) {
        let strings = items
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect();
        return Ok(AttributeValue::StrList(strings));
    }

    if items.iter().all(Value::is_i64) {
        return Ok(AttributeValue::IntList(
            items.iter().filter_map(Value::as_i64).collect(),
        ));
    }

    if items.iter().all(Value::is_number) {
        return Ok(AttributeValue::Float64List(
            items.iter().filter_map(Value::as_f64).collect(),
        ));
    }

    Err(UnsupportedValue(Value::Array(items).to_string()))
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f32> for AttributeValue {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Vec<i64>> for AttributeValue {
    fn from(v: Vec<i64>) -> Self {
        Self::IntList(v)
    }
}

impl From<Vec<f32>> for AttributeValue {
    fn from(v: Vec<f32>) -> Self {
        Self::Float32List(v)
    }
}

impl From<Vec<f64>> for AttributeValue {
    fn from(v: Vec<f64>) -> Self {
        Self::Float64List(v)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(v: Vec<String>) -> Self {
        Self::StrList(v)
    }
}
