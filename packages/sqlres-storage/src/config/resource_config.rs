//! Resource configuration and its YAML schema

use serde::{Deserialize, Serialize};
use sqlres_core::{EntityField, FieldColumnMap, PlaceholderStyle};
use std::path::Path;
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::validation::Validatable;
use crate::application::{DeleteMode, InsertMode, UpdateMode};
use crate::domain::models::{Join, TableRef};

pub const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Everything needed to assemble a `ResourceModel`
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceConfig {
    pub table: TableRef,
    pub fields: FieldColumnMap,
    pub identifier: Option<EntityField>,
    pub placeholders: PlaceholderStyle,
    pub insert_mode: InsertMode,
    pub update_mode: UpdateMode,
    pub delete_mode: DeleteMode,
    /// Extra tables in the SELECT's FROM list
    pub tables: Vec<TableRef>,
    pub joins: Vec<Join>,
}

/// YAML Schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ResourceConfigV1 {
    /// Schema version (always 1 for v1)
    #[serde(default)]
    version: Option<u32>,
    table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alias: Option<String>,
    fields: FieldColumnMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    identifier: Option<EntityField>,
    #[serde(default)]
    placeholders: PlaceholderStyle,
    #[serde(default)]
    insert_mode: InsertMode,
    #[serde(default)]
    update_mode: UpdateMode,
    #[serde(default)]
    delete_mode: DeleteMode,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tables: Vec<TableRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    joins: Vec<Join>,
}

impl ResourceConfig {
    pub fn new(table: impl Into<String>, fields: FieldColumnMap) -> Self {
        Self {
            table: TableRef::new(table),
            fields,
            identifier: None,
            placeholders: PlaceholderStyle::default(),
            insert_mode: InsertMode::default(),
            update_mode: UpdateMode::default(),
            delete_mode: DeleteMode::default(),
            tables: Vec::new(),
            joins: Vec::new(),
        }
    }

    pub fn identifier(mut self, identifier: EntityField) -> Self {
        self.identifier = Some(identifier);
        self
    }

    pub fn placeholders(mut self, style: PlaceholderStyle) -> Self {
        self.placeholders = style;
        self
    }

    pub fn insert_mode(mut self, mode: InsertMode) -> Self {
        self.insert_mode = mode;
        self
    }

    pub fn update_mode(mut self, mode: UpdateMode) -> Self {
        self.update_mode = mode;
        self
    }

    pub fn delete_mode(mut self, mode: DeleteMode) -> Self {
        self.delete_mode = mode;
        self
    }

    pub fn join(mut self, join: Join) -> Self {
        self.joins.push(join);
        self
    }

    /// Parse and validate a v1 YAML document
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let schema: ResourceConfigV1 = serde_yaml::from_str(content)?;

        match schema.version {
            None => return Err(ConfigError::MissingVersion),
            Some(found) if !SUPPORTED_VERSIONS.contains(&found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        let config = Self {
            table: TableRef {
                name: schema.table,
                alias: schema.alias,
            },
            fields: schema.fields,
            identifier: schema.identifier,
            placeholders: schema.placeholders,
            insert_mode: schema.insert_mode,
            update_mode: schema.update_mode,
            delete_mode: schema.delete_mode,
            tables: schema.tables,
            joins: schema.joins,
        };
        config.validate()?;

        debug!(table = %config.table.name, fields = config.fields.len(), "loaded resource config");
        Ok(config)
    }

    /// Load from YAML file (v1 schema)
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Export to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let schema = ResourceConfigV1 {
            version: Some(1),
            table: self.table.name.clone(),
            alias: self.table.alias.clone(),
            fields: self.fields.clone(),
            identifier: self.identifier.clone(),
            placeholders: self.placeholders,
            insert_mode: self.insert_mode,
            update_mode: self.update_mode,
            delete_mode: self.delete_mode,
            tables: self.tables.clone(),
            joins: self.joins.clone(),
        };
        Ok(serde_yaml::to_string(&schema)?)
    }
}

impl Validatable for TableRef {
    fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::missing("table", self.config_name()));
        }
        if self.alias.as_deref().is_some_and(|alias| alias.trim().is_empty()) {
            return Err(ConfigError::invalid(
                self.config_name(),
                format!("empty alias for table '{}'", self.name),
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "TableRef"
    }
}

impl Validatable for Join {
    fn validate(&self) -> ConfigResult<()> {
        self.table.validate()?;
        if self.on.terms.is_empty() {
            return Err(ConfigError::invalid(
                self.config_name(),
                format!("join on '{}' has an empty ON condition", self.table.name),
            ));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "Join"
    }
}

impl Validatable for ResourceConfig {
    fn validate(&self) -> ConfigResult<()> {
        self.table.validate()?;
        self.tables.validate()?;
        self.joins.validate()?;

        if self.fields.is_empty() {
            return Err(ConfigError::missing("fields", self.config_name()));
        }
        if let Some((field, _)) = self.fields.iter().find(|(_, column)| column.trim().is_empty()) {
            return Err(ConfigError::invalid(
                self.config_name(),
                format!("field '{}' maps to an empty column", field),
            ));
        }

        if let Some(identifier) = &self.identifier {
            if !self.fields.contains_field(&identifier.field) {
                return Err(ConfigError::invalid(
                    self.config_name(),
                    format!("identifier '{}' is not a mapped field", identifier.field),
                ));
            }
        }

        let needs_identifier = self.update_mode == UpdateMode::ByIdentifier
            || self.delete_mode == DeleteMode::ByIdentifier;
        if needs_identifier && self.identifier.is_none() {
            return Err(ConfigError::invalid(
                self.config_name(),
                "by_identifier modes require an 'identifier'",
            ));
        }

        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "ResourceConfig"
    }
}
