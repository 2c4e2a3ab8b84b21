//! SQLite adapter for the query executor port

mod executor;

pub use executor::SqliteExecutor;
