//! Ports (trait interfaces) for the collaborators a resource model drives
//!
//! Renderer and executor are paired: the renderer emits the placeholders the
//! `ValueHashMap` carries, and the executor receives `ValueHashMap::args()`.
//! Neither side may reorder what the other produced.

use sqlres_core::{Expression, FieldColumnMap, Result, Value, ValueHashMap};

use super::models::{
    DeleteStatement, ExecutionOutcome, InsertStatement, Row, SelectStatement, UpdateStatement,
};

/// Everything a renderer needs besides the statement itself
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub values: &'a ValueHashMap,
    pub fields: &'a FieldColumnMap,
}

impl<'a> RenderContext<'a> {
    pub fn new(values: &'a ValueHashMap, fields: &'a FieldColumnMap) -> Self {
        Self { values, fields }
    }
}

/// SQL Renderer Port
///
/// Placeholders must appear in the same relative order as the binder's
/// depth-first traversal produced them.
pub trait SqlRenderer: Send + Sync {
    fn render_condition(&self, condition: &Expression, ctx: &RenderContext<'_>) -> Result<String>;

    fn render_select(&self, statement: &SelectStatement<'_>, ctx: &RenderContext<'_>)
        -> Result<String>;

    fn render_insert(&self, statement: &InsertStatement<'_>, ctx: &RenderContext<'_>)
        -> Result<String>;

    fn render_update(&self, statement: &UpdateStatement<'_>, ctx: &RenderContext<'_>)
        -> Result<String>;

    fn render_delete(&self, statement: &DeleteStatement<'_>, ctx: &RenderContext<'_>)
        -> Result<String>;
}

/// Query Executor Port
///
/// `args` is positionally ordered: `args[i]` binds placeholder position `i + 1`.
/// Failures are reported as `ErrorKind::Execution` and are never retried by callers.
pub trait QueryExecutor: Send + Sync {
    /// Run a statement that returns rows
    fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;

    /// Run a statement that modifies rows
    fn execute(&self, sql: &str, args: &[Value]) -> Result<ExecutionOutcome>;
}
