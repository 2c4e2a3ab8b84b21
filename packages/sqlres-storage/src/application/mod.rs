//! Application layer - CRUD orchestrators
//!
//! Each orchestrator performs one transition per call: bind the literals,
//! render through the `SqlRenderer`, hand the SQL and `ValueHashMap::args()`
//! to the `QueryExecutor`. Executor failures propagate unchanged; nothing is
//! retried.

pub mod delete;
pub mod insert;
pub mod resource_model;
pub mod select;
pub mod update;

pub use delete::{DeleteMode, DeleteResourceModel, IDS_PER_STATEMENT};
pub use insert::{InsertMode, InsertResourceModel};
pub use resource_model::ResourceModel;
pub use select::SelectResourceModel;
pub use update::{UpdateMode, UpdateResourceModel};

use sqlres_core::{Container, FieldColumnMap, ResourceError, Result, Value};

use crate::domain::models::Row;

/// Read every mapped field out of `record` into a column → value row.
///
/// Missing fields are skipped; any other container failure propagates.
pub(crate) fn read_row<C: Container + ?Sized>(fields: &FieldColumnMap, record: &C) -> Result<Row> {
    let mut row = Row::with_capacity(fields.len());
    for (field, column) in fields.iter() {
        let value = match record.get_field(field) {
            Ok(value) => value,
            Err(err) if err.is_not_found() => continue,
            Err(err) => return Err(err),
        };
        if let Value::List(_) = value {
            return Err(ResourceError::invalid_argument(format!(
                "Field '{}' holds a list; expected a scalar",
                field
            )));
        }
        row.insert(column.to_string(), value);
    }
    Ok(row)
}
