//! sqlres-core - expression compilation and parameter binding
//!
//! The engine behind the sqlres resource models:
//!
//! 1. **Expression model**: condition trees of literals, field references and nested expressions
//! 2. **Identifier extraction**: resolve "rows whose id matches ..." into a concrete id list
//! 3. **Parameter binding**: assign every distinct literal a placeholder, keeping placeholder
//!    positions aligned with the executor's argument array
//! 4. **Field mapping**: consumer field names → physical column names, record containers
//!
//! ## Usage
//!
//! ```rust
//! use sqlres_core::{EntityField, Expression, ParameterBinder, PlaceholderStyle, Value};
//!
//! let condition = Expression::or([
//!     Expression::equal_to(EntityField::new("posts", "status"), "publish"),
//!     Expression::in_list(EntityField::new("posts", "id"), vec![3, 4]),
//! ]);
//!
//! let map = ParameterBinder::with_style(PlaceholderStyle::Numbered)
//!     .bind(&condition)
//!     .unwrap();
//!
//! assert_eq!(map.placeholders(), vec!["%1$s", "%2$d", "%3$d"]);
//! assert_eq!(map.args(), vec![Value::from("publish"), Value::Int(3), Value::Int(4)]);
//! ```

pub mod binding;
pub mod error;
pub mod expression;
pub mod extraction;
pub mod mapping;
pub mod value;

pub use error::{ErrorKind, ResourceError, Result};

pub use binding::{
    Binding, BindingStrategy, ContentHashPlaceholders, NumberedPlaceholders, ParameterBinder,
    PlaceholderStyle, ValueHashMap,
};
pub use expression::{EntityField, Expression, ExpressionKind, Term};
pub use extraction::{ExpressionExtractor, IdentifierExtractor, MAX_RANGE_LEN};
pub use mapping::{Container, FieldColumnMap, Record};
pub use value::{TypeTag, Value};
