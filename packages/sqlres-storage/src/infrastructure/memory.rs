//! Recording executor
//!
//! In-memory `QueryExecutor` that keeps every call it receives and answers
//! from a script. Used for dry runs and for asserting exactly which
//! statements an orchestrator issued.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fmt;
use sqlres_core::{ResourceError, Result, Value};

use crate::domain::models::{ExecutionOutcome, Row};
use crate::domain::ports::QueryExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Query,
    Execute,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallKind::Query => write!(f, "query"),
            CallKind::Execute => write!(f, "execute"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub sql: String,
    pub args: Vec<Value>,
}

enum Scripted<T> {
    Ok(T),
    Fail(String),
}

#[derive(Default)]
struct Script {
    rows: VecDeque<Scripted<Vec<Row>>>,
    outcomes: VecDeque<Scripted<ExecutionOutcome>>,
}

/// Unscripted queries return no rows; unscripted statements report one affected row.
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedCall>>,
    script: Mutex<Script>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows returned by the next unanswered `query`
    pub fn push_rows(&self, rows: Vec<Row>) -> &Self {
        self.script.lock().rows.push_back(Scripted::Ok(rows));
        self
    }

    /// Outcome returned by the next unanswered `execute`
    pub fn push_outcome(&self, outcome: ExecutionOutcome) -> &Self {
        self.script.lock().outcomes.push_back(Scripted::Ok(outcome));
        self
    }

    /// Shorthand for an insert outcome with a generated id
    pub fn push_insert_id(&self, id: i64) -> &Self {
        self.push_outcome(ExecutionOutcome {
            affected_rows: 1,
            last_insert_id: Some(id),
        })
    }

    /// Make the next `execute` fail with an execution error
    pub fn push_execute_failure(&self, message: impl Into<String>) -> &Self {
        self.script
            .lock()
            .outcomes
            .push_back(Scripted::Fail(message.into()));
        self
    }

    /// Make the next `query` fail with an execution error
    pub fn push_query_failure(&self, message: impl Into<String>) -> &Self {
        self.script.lock().rows.push_back(Scripted::Fail(message.into()));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().last().cloned()
    }

    fn record(&self, kind: CallKind, sql: &str, args: &[Value]) {
        self.calls.lock().push(RecordedCall {
            kind,
            sql: sql.to_string(),
            args: args.to_vec(),
        });
    }
}

impl QueryExecutor for RecordingExecutor {
    fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.record(CallKind::Query, sql, args);
        match self.script.lock().rows.pop_front() {
            Some(Scripted::Ok(rows)) => Ok(rows),
            Some(Scripted::Fail(message)) => Err(ResourceError::execution(message)),
            None => Ok(Vec::new()),
        }
    }

    fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecutionOutcome> {
        self.record(CallKind::Execute, sql, args);
        match self.script.lock().outcomes.pop_front() {
            Some(Scripted::Ok(outcome)) => Ok(outcome),
            Some(Scripted::Fail(message)) => Err(ResourceError::execution(message)),
            None => Ok(ExecutionOutcome {
                affected_rows: 1,
                last_insert_id: None,
            }),
        }
    }
}
