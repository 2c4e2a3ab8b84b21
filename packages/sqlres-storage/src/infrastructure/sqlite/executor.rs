//! SQLite query executor
//!
//! Accepts SQL carrying either placeholder style. Numbered placeholders are
//! rewritten to `?N`; content-hash placeholders are bound by the position
//! embedded in their name. Either way `args[N - 1]` lands on position N.

use parking_lot::Mutex;
use rusqlite::types::{Value as SqlValue, ValueRef};
use rusqlite::{Connection, Statement};
use sqlres_core::{ResourceError, Result, Value};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::domain::models::{ExecutionOutcome, Row};
use crate::domain::ports::QueryExecutor;
use crate::infrastructure::placeholders::{numbered_to_indexed, position_of};

/// SQLite-based QueryExecutor implementation
#[derive(Clone)]
pub struct SqliteExecutor {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteExecutor {
    /// Open (or create) a database file
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(db_path).map_err(sqlite_error)?;
        Ok(Self::from_connection(conn))
    }

    /// In-memory database (for testing)
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(sqlite_error)?;
        Ok(Self::from_connection(conn))
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run parameterless statements, e.g. schema setup
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.lock().execute_batch(sql).map_err(sqlite_error)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        let sql = numbered_to_indexed(sql);
        debug!(args = args.len(), "executing query");
        trace!(sql = %sql);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&sql).map_err(sqlite_error)?;
        bind_args(&mut stmt, args)?;

        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let mut rows = stmt.raw_query();
        let mut result = Vec::new();

        while let Some(row) = rows.next().map_err(sqlite_error)? {
            let mut mapped = Row::with_capacity(columns.len());
            for (idx, column) in columns.iter().enumerate() {
                let value = row.get_ref(idx).map_err(sqlite_error)?;
                mapped.insert(column.clone(), from_sql(value));
            }
            result.push(mapped);
        }

        debug!(rows = result.len(), "query complete");
        Ok(result)
    }

    fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecutionOutcome> {
        let sql = numbered_to_indexed(sql);
        debug!(args = args.len(), "executing statement");
        trace!(sql = %sql);

        let conn = self.conn.lock();
        let affected_rows = {
            let mut stmt = conn.prepare(&sql).map_err(sqlite_error)?;
            bind_args(&mut stmt, args)?;
            stmt.raw_execute().map_err(sqlite_error)?
        };

        let is_insert = sql
            .trim_start()
            .get(..6)
            .is_some_and(|verb| verb.eq_ignore_ascii_case("INSERT"));
        let last_insert_id = (is_insert && affected_rows > 0).then(|| conn.last_insert_rowid());

        Ok(ExecutionOutcome {
            affected_rows,
            last_insert_id,
        })
    }
}

/// Bind every statement parameter to the argument at the position its name carries
fn bind_args(stmt: &mut Statement<'_>, args: &[Value]) -> Result<()> {
    let count = stmt.parameter_count();
    if count != args.len() {
        return Err(ResourceError::execution(format!(
            "Statement expects {} parameter(s), got {} argument(s)",
            count,
            args.len()
        )));
    }

    for index in 1..=count {
        let position = match stmt.parameter_name(index) {
            Some(name) => position_of(name).ok_or_else(|| {
                ResourceError::execution(format!("Unrecognized parameter '{}'", name))
            })?,
            None => index,
        };
        let arg = args.get(position.wrapping_sub(1)).ok_or_else(|| {
            ResourceError::execution(format!("No argument for parameter position {}", position))
        })?;
        stmt.raw_bind_parameter(index, to_sql(arg)?)
            .map_err(sqlite_error)?;
    }
    Ok(())
}

fn to_sql(value: &Value) -> Result<SqlValue> {
    Ok(match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Int(i) => SqlValue::Integer(*i),
        Value::Float(f) => SqlValue::Real(*f),
        Value::String(s) => SqlValue::Text(s.clone()),
        Value::List(_) => {
            return Err(ResourceError::execution(
                "List arguments cannot be bound to a single parameter",
            ))
        }
    })
}

fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Int(i),
        ValueRef::Real(f) => Value::Float(f),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
    }
}

fn sqlite_error(err: rusqlite::Error) -> ResourceError {
    ResourceError::execution(format!("SQLite error: {}", err)).with_source(err)
}
