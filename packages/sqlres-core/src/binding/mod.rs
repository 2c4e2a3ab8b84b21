//! Parameter binding
//!
//! Walks a condition tree and assigns every distinct literal value a
//! placeholder token. The resulting `ValueHashMap` is the binding contract
//! between the SQL renderer and the query executor:
//!
//! ```text
//! condition ──► ParameterBinder ──► ValueHashMap ──┬──► SqlRenderer (placeholders in SQL text)
//!                                                  └──► QueryExecutor (args(), insertion order)
//! ```
//!
//! The Nth entry of the map (1-based) is the value bound to position N.

pub mod binder;
pub mod hash_map;
pub mod strategy;

pub use binder::ParameterBinder;
pub use hash_map::{Binding, ValueHashMap};
pub use strategy::{BindingStrategy, ContentHashPlaceholders, NumberedPlaceholders, PlaceholderStyle};
