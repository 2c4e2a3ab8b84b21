//! Record containers
//!
//! Insert and update callers hand records over in whatever shape they hold
//! them: a `Record`, a plain map, or a JSON object. `Container` reads one
//! field at a time and reports a missing key as `ErrorKind::NotFound`, which
//! insert callers treat as "skip this field".

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::error::{ResourceError, Result};
use crate::value::Value;

/// Read access to a field → value container
pub trait Container {
    /// Value stored under `key`; `ErrorKind::NotFound` if absent
    fn get_field(&self, key: &str) -> Result<Value>;

    fn has_field(&self, key: &str) -> bool;
}

/// Request-scoped field → value map for one row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Container for Record {
    fn get_field(&self, key: &str) -> Result<Value> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(key))
    }

    fn has_field(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl Container for HashMap<String, Value> {
    fn get_field(&self, key: &str) -> Result<Value> {
        self.get(key)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(key))
    }

    fn has_field(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl Container for BTreeMap<String, Value> {
    fn get_field(&self, key: &str) -> Result<Value> {
        self.get(key)
            .cloned()
            .ok_or_else(|| ResourceError::not_found(key))
    }

    fn has_field(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl Container for serde_json::Map<String, serde_json::Value> {
    fn get_field(&self, key: &str) -> Result<Value> {
        self.get(key)
            .ok_or_else(|| ResourceError::not_found(key))
            .and_then(Value::try_from)
    }

    fn has_field(&self, key: &str) -> bool {
        self.contains_key(key)
    }
}

impl Container for serde_json::Value {
    /// Only JSON objects are containers; any other JSON value is malformed.
    fn get_field(&self, key: &str) -> Result<Value> {
        match self {
            serde_json::Value::Object(map) => map.get_field(key),
            other => Err(ResourceError::invalid_argument(format!(
                "JSON value is not a container: {}",
                other
            ))),
        }
    }

    fn has_field(&self, key: &str) -> bool {
        self.as_object().is_some_and(|map| map.contains_key(key))
    }
}

impl<C: Container + ?Sized> Container for &C {
    fn get_field(&self, key: &str) -> Result<Value> {
        (**self).get_field(key)
    }

    fn has_field(&self, key: &str) -> bool {
        (**self).has_field(key)
    }
}
