//! Infrastructure layer - SQL adapters
//!
//! - `SqliteRenderer`: SQL text for the SQLite dialect
//! - `SqliteExecutor`: rusqlite-backed executor (feature `sqlite`)
//! - `RecordingExecutor`: in-memory executor for dry runs and tests

pub mod memory;
pub mod placeholders;
pub mod sql_renderer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::{CallKind, RecordedCall, RecordingExecutor};
pub use sql_renderer::SqliteRenderer;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteExecutor;
