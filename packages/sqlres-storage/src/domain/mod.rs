//! Domain layer for resource models
//!
//! # Models
//!
//! - `SelectStatement` / `InsertStatement` / `UpdateStatement` / `DeleteStatement`:
//!   what the orchestrators hand to the SQL renderer
//! - `Row`, `ExecutionOutcome`, `InsertOutcome`: what comes back
//!
//! # Ports
//!
//! - `SqlRenderer`: turns statements + a value hash map into SQL text
//! - `QueryExecutor`: runs SQL text with positionally ordered arguments

pub mod models;
pub mod ports;

pub use models::{
    DeleteStatement, ExecutionOutcome, InsertOutcome, InsertStatement, Join, JoinKind, OrderBy,
    Row, SelectStatement, SortDirection, TableRef, UpdateStatement,
};
pub use ports::{QueryExecutor, RenderContext, SqlRenderer};
