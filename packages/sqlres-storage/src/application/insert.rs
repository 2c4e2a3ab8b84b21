//! Insert orchestrator
//!
//! Records are read field by field through `Container`; fields a record does
//! not carry are left out of its row, so partial records are accepted.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use sqlres_core::{Container, FieldColumnMap, ParameterBinder, PlaceholderStyle, Result, ValueHashMap};
use std::sync::Arc;
use tracing::{debug, trace, warn};

use super::read_row;
use crate::domain::models::{ExecutionOutcome, InsertOutcome, InsertStatement, Row};
use crate::domain::ports::{QueryExecutor, RenderContext, SqlRenderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertMode {
    /// One multi-row INSERT; one value map spans every row
    #[default]
    Batched,
    /// One INSERT per record, executed in input order; value map reset per record
    PerRecord,
}

pub struct InsertResourceModel {
    renderer: Arc<dyn SqlRenderer>,
    executor: Arc<dyn QueryExecutor>,
    table: String,
    fields: FieldColumnMap,
    binder: ParameterBinder,
    mode: InsertMode,
}

impl InsertResourceModel {
    pub fn new(
        renderer: Arc<dyn SqlRenderer>,
        executor: Arc<dyn QueryExecutor>,
        table: impl Into<String>,
        fields: FieldColumnMap,
        style: PlaceholderStyle,
    ) -> Self {
        Self {
            renderer,
            executor,
            table: table.into(),
            fields,
            binder: ParameterBinder::with_style(style),
            mode: InsertMode::default(),
        }
    }

    pub fn with_mode(mut self, mode: InsertMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> InsertMode {
        self.mode
    }

    pub fn insert<C: Container>(&self, records: &[C]) -> Result<InsertOutcome> {
        if records.is_empty() {
            return Ok(InsertOutcome::default());
        }

        let rows = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let row = read_row(&self.fields, record)?;
                if row.is_empty() {
                    warn!(table = %self.table, record = idx, "record has no mapped fields");
                }
                Ok(row)
            })
            .collect::<Result<Vec<Row>>>()?;

        match self.mode {
            InsertMode::Batched => self.insert_batch(&rows),
            InsertMode::PerRecord => self.insert_each(&rows),
        }
    }

    fn insert_batch(&self, rows: &[Row]) -> Result<InsertOutcome> {
        let mut values = ValueHashMap::new();
        let mut columns = IndexSet::new();
        for row in rows {
            for (column, value) in row {
                columns.insert(column.clone());
                self.binder.bind_value(&mut values, value)?;
            }
        }
        let columns: Vec<String> = columns.into_iter().collect();

        let outcome = self.execute(&columns, rows, &values)?;
        Ok(InsertOutcome {
            ids: Vec::new(),
            affected_rows: outcome.affected_rows,
        })
    }

    fn insert_each(&self, rows: &[Row]) -> Result<InsertOutcome> {
        let mut result = InsertOutcome {
            ids: Vec::with_capacity(rows.len()),
            affected_rows: 0,
        };

        // A failure on record k leaves records before k in place
        for row in rows {
            let mut values = ValueHashMap::new();
            for value in row.values() {
                self.binder.bind_value(&mut values, value)?;
            }
            let columns: Vec<String> = row.keys().cloned().collect();

            let outcome = self.execute(&columns, std::slice::from_ref(row), &values)?;
            result.ids.push(outcome.last_insert_id);
            result.affected_rows += outcome.affected_rows;
        }

        Ok(result)
    }

    fn execute(
        &self,
        columns: &[String],
        rows: &[Row],
        values: &ValueHashMap,
    ) -> Result<ExecutionOutcome> {
        let statement = InsertStatement {
            table: &self.table,
            columns,
            rows,
        };
        let sql = self
            .renderer
            .render_insert(&statement, &RenderContext::new(values, &self.fields))?;

        debug!(table = %self.table, rows = rows.len(), args = values.len(), "insert");
        trace!(%sql);

        self.executor.execute(&sql, &values.args())
    }
}
