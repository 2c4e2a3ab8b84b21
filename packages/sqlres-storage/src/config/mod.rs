//! Resource model configuration
//!
//! Versioned YAML describing one resource: its table, the field → column map,
//! the identifying field, the placeholder style and the mutation modes.
//!
//! ```yaml
//! version: 1
//! table: wp_posts
//! fields:
//!   id: ID
//!   title: post_title
//!   status: post_status
//! identifier:
//!   field: id
//! placeholders: content_hash
//! insert_mode: per_record
//! update_mode: by_identifier
//! ```

pub mod error;
pub mod resource_config;
pub mod validation;

pub use error::{ConfigError, ConfigResult};
pub use resource_config::{ResourceConfig, SUPPORTED_VERSIONS};
pub use validation::Validatable;
