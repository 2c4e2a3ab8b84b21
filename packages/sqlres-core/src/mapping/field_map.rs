//! Field → column map
//!
//! Built once per resource model and never mutated afterwards. Iteration
//! follows declaration order, which fixes the column order of rendered
//! SELECT lists and INSERT column lists.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ResourceError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldColumnMap {
    columns: IndexMap<String, String>,
}

impl FieldColumnMap {
    /// Build from `(field, column)` pairs, rejecting duplicate field names.
    pub fn from_pairs<I, F, C>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut columns = IndexMap::new();
        for (field, column) in pairs {
            let field = field.into();
            if columns.contains_key(&field) {
                return Err(ResourceError::invalid_argument(format!(
                    "Duplicate field '{}' in field-column map",
                    field
                )));
            }
            columns.insert(field, column.into());
        }
        Ok(Self { columns })
    }

    /// Column for `field`, if mapped
    pub fn column(&self, field: &str) -> Option<&str> {
        self.columns.get(field).map(String::as_str)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.columns.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.values().map(String::as_str)
    }

    /// `(field, column)` pairs in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(f, c)| (f.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
