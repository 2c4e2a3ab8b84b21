//! sqlres-storage - SQL resource models
//!
//! CRUD orchestration over the `sqlres-core` binding engine:
//!
//! 1. **Domain**: statement models and the `SqlRenderer` / `QueryExecutor` ports
//! 2. **Application**: select / insert / update / delete orchestrators and the
//!    `ResourceModel` facade
//! 3. **Infrastructure**: SQLite renderer, rusqlite executor, recording executor
//! 4. **Config**: versioned YAML resource definitions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sqlres_storage::{ResourceConfig, ResourceModel, SqliteExecutor, SqliteRenderer};
//! use sqlres_core::{EntityField, Expression, Record};
//! use std::sync::Arc;
//!
//! let config = ResourceConfig::from_yaml_file("posts.yaml")?;
//! let executor = Arc::new(SqliteExecutor::open("site.db")?);
//! let posts = ResourceModel::from_config(&config, Arc::new(SqliteRenderer), executor)?;
//!
//! posts.insert(&[Record::new().with("title", "Hello")])?;
//! let drafts = posts.select(
//!     Some(&Expression::equal_to(EntityField::bare("status"), "draft")),
//!     &[],
//!     None,
//!     None,
//! )?;
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use application::{
    DeleteMode, DeleteResourceModel, InsertMode, InsertResourceModel, ResourceModel,
    SelectResourceModel, UpdateMode, UpdateResourceModel, IDS_PER_STATEMENT,
};
pub use config::{ConfigError, ConfigResult, ResourceConfig, Validatable};
pub use domain::{
    DeleteStatement, ExecutionOutcome, InsertOutcome, InsertStatement, Join, JoinKind, OrderBy,
    QueryExecutor, RenderContext, Row, SelectStatement, SortDirection, SqlRenderer, TableRef,
    UpdateStatement,
};
pub use infrastructure::{CallKind, RecordedCall, RecordingExecutor, SqliteRenderer};

#[cfg(feature = "sqlite")]
pub use infrastructure::SqliteExecutor;
