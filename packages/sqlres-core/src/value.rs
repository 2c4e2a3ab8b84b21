//! Literal values carried by expression terms and records
//!
//! A `Value` is either a scalar or a list of scalars (membership tests).
//! Every bindable value has a *canonical string form*; the parameter binder
//! deduplicates and filters values by that form only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ResourceError, Result};

/// Literal value (JSON compatible)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
}

/// Placeholder type tag derived from a value's runtime type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Integer,
    Float,
    String,
}

impl TypeTag {
    /// sprintf-style conversion character
    pub fn as_char(&self) -> char {
        match self {
            TypeTag::Integer => 'd',
            TypeTag::Float => 'f',
            TypeTag::String => 's',
        }
    }
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int(_) => TypeTag::Integer,
            Value::Float(_) => TypeTag::Float,
            _ => TypeTag::String,
        }
    }

    /// Canonical string form used for binding deduplication and ignore lists.
    ///
    /// Int `5` and String `"5"` share the form `"5"`.
    pub fn canonical_string(&self) -> Result<String> {
        match self {
            Value::Int(i) => Ok(i.to_string()),
            Value::Float(f) => {
                if !f.is_finite() {
                    return Err(ResourceError::invalid_argument(format!(
                        "Float value {} cannot be normalized to a string",
                        f
                    )));
                }
                Ok(f.to_string())
            }
            Value::String(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(if *b { "1" } else { "0" }.to_string()),
            Value::Null => Err(ResourceError::invalid_argument(
                "Null cannot be normalized to a string",
            )),
            Value::List(_) => Err(ResourceError::invalid_argument(
                "List cannot be normalized to a string",
            )),
        }
    }

    /// Normalize into an integer.
    ///
    /// Accepts integers, whole-valued floats and strings holding a whole number.
    pub fn normalize_int(&self) -> Result<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Float(f) => float_to_int(*f).ok_or_else(|| {
                ResourceError::invalid_argument(format!("Float {} is not a whole number", f))
            }),
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    return Ok(i);
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(float_to_int)
                    .ok_or_else(|| {
                        ResourceError::invalid_argument(format!(
                            "String '{}' cannot be normalized to an integer",
                            s
                        ))
                    })
            }
            other => Err(ResourceError::invalid_argument(format!(
                "Value {} cannot be normalized to an integer",
                other
            ))),
        }
    }

    /// Normalize into a list of values.
    pub fn normalize_list(&self) -> Result<&[Value]> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(ResourceError::invalid_argument(format!(
                "Value {} cannot be normalized to a list",
                other
            ))),
        }
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "'{}'", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Conversions
// ═══════════════════════════════════════════════════════════════════════════

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl TryFrom<&serde_json::Value> for Value {
    type Error = ResourceError;

    /// JSON objects have no scalar form and are carried as their JSON text.
    fn try_from(json: &serde_json::Value) -> Result<Self> {
        Ok(match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if n.is_u64() {
                    return Err(ResourceError::invalid_argument(format!(
                        "integer out of range: {}",
                        n
                    )));
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s.clone()),
            serde_json::Value::Array(items) => Value::List(
                items
                    .iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_json::Value::Object(_) => Value::String(json.to_string()),
        })
    }
}
