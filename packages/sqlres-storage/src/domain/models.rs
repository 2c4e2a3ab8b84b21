//! Statement and result models

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sqlres_core::{Expression, FieldColumnMap, Value};

/// Raw result row (column alias → value), or a column → value row for writes
pub type Row = IndexMap<String, Value>;

// ═══════════════════════════════════════════════════════════════════════════
// Clauses
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// ORDER BY entry over a consumer field name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Table with an optional alias; the alias is the entity name used by field references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
        }
    }

    pub fn aliased(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: Some(alias.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    #[default]
    Inner,
    Left,
}

impl JoinKind {
    pub fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Join {
    #[serde(default)]
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: Expression,
}

// ═══════════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SelectStatement<'a> {
    /// Selected fields; each column is aliased back to its field name
    pub fields: &'a FieldColumnMap,
    pub tables: &'a [TableRef],
    pub joins: &'a [Join],
    pub condition: Option<&'a Expression>,
    pub ordering: &'a [OrderBy],
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct InsertStatement<'a> {
    pub table: &'a str,
    /// Column list shared by every row
    pub columns: &'a [String],
    /// column → value; a column missing from a row renders as NULL
    pub rows: &'a [Row],
}

#[derive(Debug, Clone)]
pub struct UpdateStatement<'a> {
    pub table: &'a str,
    /// column → new value
    pub changes: &'a Row,
    pub condition: Option<&'a Expression>,
    pub ordering: &'a [OrderBy],
    pub limit: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct DeleteStatement<'a> {
    pub table: &'a str,
    pub condition: Option<&'a Expression>,
    pub ordering: &'a [OrderBy],
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Results
// ═══════════════════════════════════════════════════════════════════════════

/// Result of a non-query statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub affected_rows: usize,
    /// Generated identifier of the last inserted row, if the statement produced one
    pub last_insert_id: Option<i64>,
}

/// Result of an insert call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertOutcome {
    /// One entry per record in input order (per-record mode); empty for batched inserts
    pub ids: Vec<Option<i64>>,
    pub affected_rows: usize,
}
