//! Configuration error types

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing version field in YAML
    #[error("Missing 'version' field in resource configuration. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// A required setting is absent or empty
    #[error("Missing required setting '{field}' in {config}")]
    MissingField { field: String, config: &'static str },

    /// Settings that cannot be used together
    #[error("Invalid {config}: {reason}")]
    Invalid { config: &'static str, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    pub fn missing(field: impl Into<String>, config: &'static str) -> Self {
        Self::MissingField {
            field: field.into(),
            config,
        }
    }

    pub fn invalid(config: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            config,
            reason: reason.into(),
        }
    }
}
