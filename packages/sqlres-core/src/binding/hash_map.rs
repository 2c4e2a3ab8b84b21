//! Value hash map - canonical value form → placeholder binding
//!
//! Insertion order *is* the binding contract: the entry inserted Nth carries
//! position N, and `args()` returns the values in that order for the executor.

use indexmap::IndexMap;

use crate::value::Value;

/// One bound value
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    /// 1-based position in the map
    pub position: usize,
    /// Token emitted into the rendered SQL
    pub placeholder: String,
    /// Value exactly as first encountered
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueHashMap {
    entries: IndexMap<String, Binding>,
}

impl ValueHashMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position the next inserted value will receive
    pub fn next_position(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn contains(&self, canonical: &str) -> bool {
        self.entries.contains_key(canonical)
    }

    pub fn get(&self, canonical: &str) -> Option<&Binding> {
        self.entries.get(canonical)
    }

    /// Placeholder bound to `value`'s canonical form, if any
    pub fn placeholder_for(&self, value: &Value) -> Option<&str> {
        let canonical = value.canonical_string().ok()?;
        self.entries
            .get(&canonical)
            .map(|binding| binding.placeholder.as_str())
    }

    /// `(canonical form, binding)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.entries.iter().map(|(k, b)| (k.as_str(), b))
    }

    pub fn placeholders(&self) -> Vec<&str> {
        self.entries
            .values()
            .map(|binding| binding.placeholder.as_str())
            .collect()
    }

    /// Values in insertion order, aligned with placeholder positions
    pub fn args(&self) -> Vec<Value> {
        self.entries
            .values()
            .map(|binding| binding.value.clone())
            .collect()
    }

    pub(crate) fn insert(&mut self, canonical: String, placeholder: String, value: Value) {
        let position = self.next_position();
        self.entries.insert(
            canonical,
            Binding {
                position,
                placeholder,
                value,
            },
        );
    }
}
