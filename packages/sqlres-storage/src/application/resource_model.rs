//! Resource model facade
//!
//! Bundles the four orchestrators over one table definition. All of them
//! share the same renderer and executor.

use sqlres_core::{Container, Expression, Result};
use std::sync::Arc;

use super::{
    DeleteMode, DeleteResourceModel, InsertResourceModel, SelectResourceModel, UpdateMode,
    UpdateResourceModel,
};
use crate::config::{ConfigError, ConfigResult, ResourceConfig, Validatable};
use crate::domain::models::{InsertOutcome, OrderBy, Row};
use crate::domain::ports::{QueryExecutor, SqlRenderer};

pub struct ResourceModel {
    selector: SelectResourceModel,
    inserter: InsertResourceModel,
    updater: UpdateResourceModel,
    deleter: DeleteResourceModel,
}

impl ResourceModel {
    /// Assemble from a validated configuration
    pub fn from_config(
        config: &ResourceConfig,
        renderer: Arc<dyn SqlRenderer>,
        executor: Arc<dyn QueryExecutor>,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let table = &config.table;
        let style = config.placeholders;

        let mut selector = SelectResourceModel::new(
            renderer.clone(),
            executor.clone(),
            table.clone(),
            config.fields.clone(),
            style,
        );
        for extra in &config.tables {
            selector = selector.with_table(extra.clone());
        }
        for join in &config.joins {
            selector = selector.with_join(join.clone());
        }

        let inserter = InsertResourceModel::new(
            renderer.clone(),
            executor.clone(),
            table.name.clone(),
            config.fields.clone(),
            style,
        )
        .with_mode(config.insert_mode);

        let mut updater = UpdateResourceModel::new(
            renderer.clone(),
            executor.clone(),
            table.name.clone(),
            config.fields.clone(),
            style,
        );
        let mut deleter = DeleteResourceModel::new(
            renderer,
            executor,
            table.name.clone(),
            config.fields.clone(),
            style,
        );

        let identifier = || {
            config
                .identifier
                .clone()
                .ok_or_else(|| ConfigError::missing("identifier", config.config_name()))
        };
        if config.update_mode == UpdateMode::ByIdentifier {
            updater = updater.by_identifier(identifier()?);
        }
        if config.delete_mode == DeleteMode::ByIdentifier {
            deleter = deleter.by_identifier(identifier()?);
        }

        Ok(Self {
            selector,
            inserter,
            updater,
            deleter,
        })
    }

    /// Assemble from parts built by hand
    pub fn from_parts(
        selector: SelectResourceModel,
        inserter: InsertResourceModel,
        updater: UpdateResourceModel,
        deleter: DeleteResourceModel,
    ) -> Self {
        Self {
            selector,
            inserter,
            updater,
            deleter,
        }
    }

    pub fn select(
        &self,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Row>> {
        self.selector.select(condition, ordering, limit, offset)
    }

    pub fn insert<C: Container>(&self, records: &[C]) -> Result<InsertOutcome> {
        self.inserter.insert(records)
    }

    pub fn update<C: Container + ?Sized>(
        &self,
        changes: &C,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
    ) -> Result<usize> {
        self.updater.update(changes, condition, ordering, limit)
    }

    pub fn delete(
        &self,
        condition: Option<&Expression>,
        ordering: &[OrderBy],
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<usize> {
        self.deleter.delete(condition, ordering, limit, offset)
    }

    pub fn selector(&self) -> &SelectResourceModel {
        &self.selector
    }

    pub fn inserter(&self) -> &InsertResourceModel {
        &self.inserter
    }

    pub fn updater(&self) -> &UpdateResourceModel {
        &self.updater
    }

    pub fn deleter(&self) -> &DeleteResourceModel {
        &self.deleter
    }
}
