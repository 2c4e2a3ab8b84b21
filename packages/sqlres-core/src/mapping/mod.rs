//! Field/column mapping and record access
//!
//! - `FieldColumnMap`: consumer field names → physical column names
//! - `Container`: reads field values out of caller-supplied records

pub mod container;
pub mod field_map;

pub use container::{Container, Record};
pub use field_map::FieldColumnMap;
