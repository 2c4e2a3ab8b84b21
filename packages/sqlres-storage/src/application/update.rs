//! Update orchestrator
//!
//! Two ways to target rows:
//!
//! - `Direct`: the condition becomes the WHERE clause of a single UPDATE
//! - `ByIdentifier`: the condition is resolved to identifiers first, then
//!   one UPDATE per identifier is issued with `identifier = id` as its only
//!   constraint
//!
//! Both require a condition; updating every row is never implied.

use serde::{Deserialize, Serialize};
use sqlres_core::{
    Container, EntityField, Expression, ExpressionExtractor, FieldColumnMap, IdentifierExtractor,
    ParameterBinder, PlaceholderStyle, ResourceError, Result, ValueHashMap,
};
use std::sync::Arc;
use tracing::{debug, trace};

use super::read_row;
use crate::domain::models::{OrderBy, Row, UpdateStatement};
use crate::domain::ports::{QueryExecutor, RenderContext, SqlRenderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    #[default]
    Direct,
    ByIdentifier,
}

pub struct UpdateResourceModel {
    renderer: Arc<dyn SqlRenderer>,
    executor: Arc<dyn QueryExecutor>,
    table: String,
    fields: FieldColumnMap,
    /// Change-set values; no ignore list, a value may legitimately equal a field name
    values_binder: ParameterBinder,
    condition_binder: ParameterBinder,
    mode: UpdateMode,
    identifier: Option<(EntityField, Arc<dyn ExpressionExtractor>)>,
}

impl UpdateResourceModel {
    pub fn new(
        renderer: Arc<dyn SqlRenderer>,
        executor: Arc<dyn QueryExecutor>,
        table: impl Into<String>,
        fields: FieldColumnMap,
        style: PlaceholderStyle,
    ) -> Self {
        let condition_binder = ParameterBinder::with_style(style).ignoring(fields.fields());
        Self {
            renderer,
            executor,
            table: table.into(),
            fields,
            values_binder: ParameterBinder::with_style(style),
            condition_binder,
            mode: UpdateMode::Direct,
            identifier: None,
        }
    }

    /// Switch to per-identifier updates anchored on `identifier`
    pub fn by_identifier(self, identifier: EntityField) -> Self {
        let extractor = Arc::new(IdentifierExtractor::new(identifier.clone()));
        self.with_extractor(identifier, extractor)
    }

    /// Per-identifier updates with a custom extractor
    pub fn with_extractor(
        mut self,
        identifier: EntityField,
        extractor: Arc<dyn ExpressionExtractor>,
    ) -> Self {
        self.mode = UpdateMode::ByIdentifier;
        self.identifier = Some((identifier, extractor));
        self
    }

    pub fn mode(&self) -> UpdateMode {
        self.mode
    }

    /// Apply `changes` to the rows selected by `condition`; returns the affected row count.
    ///
    /// `ordering` and `limit` only apply in `Direct` mode.
    pub fn update<C: Container + ?Sized>(
        &self,
        changes: &C,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
    ) -> Result<usize> {
        let condition = condition.ok_or_else(|| {
            ResourceError::invalid_argument("A condition is required for updates")
        })?;

        let changes = read_row(&self.fields, changes)?;
        if changes.is_empty() {
            return Err(ResourceError::invalid_argument(
                "Change set has no mapped fields",
            ));
        }

        match (&self.mode, &self.identifier) {
            (UpdateMode::ByIdentifier, Some((identifier, extractor))) => {
                self.update_each(&changes, condition, identifier, extractor.as_ref())
            }
            (UpdateMode::ByIdentifier, None) => Err(ResourceError::invalid_argument(
                "Identifier updates need an identifying field",
            )),
            (UpdateMode::Direct, _) => self.update_matching(&changes, condition, ordering, limit),
        }
    }

    fn update_matching(
        &self,
        changes: &Row,
        condition: &Expression,
        ordering: &[OrderBy],
        limit: Option<u64>,
    ) -> Result<usize> {
        // SET precedes WHERE in the statement text
        let mut values = ValueHashMap::new();
        for value in changes.values() {
            self.values_binder.bind_value(&mut values, value)?;
        }
        self.condition_binder.bind_into(&mut values, condition)?;

        self.execute(changes, condition, ordering, limit, &values)
    }

    fn update_each(
        &self,
        changes: &Row,
        condition: &Expression,
        identifier: &EntityField,
        extractor: &dyn ExpressionExtractor,
    ) -> Result<usize> {
        if condition.negated {
            return Err(ResourceError::unsupported_expression(
                "Negated conditions are not supported for identifier updates",
            ));
        }

        let ids = extractor.extract(condition)?;
        if ids.is_empty() {
            return Err(ResourceError::invalid_argument("no identifiers resolved"));
        }

        // The identifier is compared by bare field name against this table
        let identifier = EntityField::bare(identifier.field.clone());
        let mut affected = 0;
        for id in ids {
            let by_id = Expression::equal_to(identifier.clone(), id);

            let mut values = ValueHashMap::new();
            for value in changes.values() {
                self.values_binder.bind_value(&mut values, value)?;
            }
            self.condition_binder.bind_into(&mut values, &by_id)?;

            affected += self.execute(changes, &by_id, &[], None, &values)?;
        }
        Ok(affected)
    }

    fn execute(
        &self,
        changes: &Row,
        condition: &Expression,
        ordering: &[OrderBy],
        limit: Option<u64>,
        values: &ValueHashMap,
    ) -> Result<usize> {
        let statement = UpdateStatement {
            table: &self.table,
            changes,
            condition: Some(condition),
            ordering,
            limit,
        };
        let sql = self
            .renderer
            .render_update(&statement, &RenderContext::new(values, &self.fields))?;

        debug!(table = %self.table, args = values.len(), "update");
        trace!(%sql);

        Ok(self.executor.execute(&sql, &values.args())?.affected_rows)
    }
}
