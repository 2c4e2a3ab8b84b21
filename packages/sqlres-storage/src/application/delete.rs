//! Delete orchestrator

use serde::{Deserialize, Serialize};
use sqlres_core::{
    EntityField, Expression, ExpressionExtractor, FieldColumnMap, IdentifierExtractor,
    ParameterBinder, PlaceholderStyle, ResourceError, Result, ValueHashMap,
};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::domain::models::{DeleteStatement, OrderBy};
use crate::domain::ports::{QueryExecutor, RenderContext, SqlRenderer};

/// Identifiers per `IN` list; stays well below SQLite's 32766 bound-variable limit
pub const IDS_PER_STATEMENT: usize = 1000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteMode {
    /// The condition becomes the WHERE clause
    #[default]
    Direct,
    /// The condition is resolved to identifiers; `IN` statements of at most
    /// `IDS_PER_STATEMENT` identifiers each remove them
    ByIdentifier,
}

pub struct DeleteResourceModel {
    renderer: Arc<dyn SqlRenderer>,
    executor: Arc<dyn QueryExecutor>,
    table: String,
    fields: FieldColumnMap,
    binder: ParameterBinder,
    mode: DeleteMode,
    identifier: Option<(EntityField, Arc<dyn ExpressionExtractor>)>,
}

impl DeleteResourceModel {
    pub fn new(
        renderer: Arc<dyn SqlRenderer>,
        executor: Arc<dyn QueryExecutor>,
        table: impl Into<String>,
        fields: FieldColumnMap,
        style: PlaceholderStyle,
    ) -> Self {
        let binder = ParameterBinder::with_style(style).ignoring(fields.fields());
        Self {
            renderer,
            executor,
            table: table.into(),
            fields,
            binder,
            mode: DeleteMode::Direct,
            identifier: None,
        }
    }

    pub fn by_identifier(self, identifier: EntityField) -> Self {
        let extractor = Arc::new(IdentifierExtractor::new(identifier.clone()));
        self.with_extractor(identifier, extractor)
    }

    pub fn with_extractor(
        mut self,
        identifier: EntityField,
        extractor: Arc<dyn ExpressionExtractor>,
    ) -> Self {
        self.mode = DeleteMode::ByIdentifier;
        self.identifier = Some((identifier, extractor));
        self
    }

    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    /// Remove the rows selected by `condition`; returns the affected row count.
    pub fn delete(
        &self,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<usize> {
        let condition = condition.ok_or_else(|| {
            ResourceError::invalid_argument("A condition is required for deletes")
        })?;

        match (&self.mode, &self.identifier) {
            (DeleteMode::ByIdentifier, Some((identifier, extractor))) => {
                let ids = extractor.extract(condition)?;
                if ids.is_empty() {
                    debug!(table = %self.table, "no identifiers resolved, nothing to delete");
                    return Ok(0);
                }

                let identifier = EntityField::bare(identifier.field.clone());
                let mut affected = 0;
                for chunk in ids.chunks(IDS_PER_STATEMENT) {
                    let by_ids = Expression::in_list(identifier.clone(), chunk.to_vec());
                    affected += self.execute(&by_ids, &[], None, None)?;
                }
                Ok(affected)
            }
            (DeleteMode::ByIdentifier, None) => Err(ResourceError::invalid_argument(
                "Identifier deletes need an identifying field",
            )),
            (DeleteMode::Direct, _) => self.execute(condition, ordering, limit, offset),
        }
    }

    fn execute(
        &self,
        condition: &Expression,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<usize> {
        let values: ValueHashMap = self.binder.bind(condition)?;

        let statement = DeleteStatement {
            table: &self.table,
            condition: Some(condition),
            ordering,
            limit,
            offset,
        };
        let sql = self
            .renderer
            .render_delete(&statement, &RenderContext::new(&values, &self.fields))?;

        debug!(table = %self.table, args = values.len(), "delete");
        trace!(%sql);

        Ok(self.executor.execute(&sql, &values.args())?.affected_rows)
    }
}
