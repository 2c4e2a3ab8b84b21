//! Error types for sqlres-core

use std::fmt;
use thiserror::Error;

/// Resource error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed argument (null condition, bad expression shape, bad value)
    InvalidArgument,
    /// Expression kind outside the supported set, or a negated expression
    UnsupportedExpressionType,
    /// Container lookup found nothing for the requested key
    NotFound,
    /// Failure reported by the query executor
    Execution,
    /// Serialization/deserialization errors
    Serialization,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::UnsupportedExpressionType => "unsupported_expression_type",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Execution => "execution",
            ErrorKind::Serialization => "serialization",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource error type
#[derive(Debug, Error)]
#[error("[{kind}] {message}")]
pub struct ResourceError {
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
    pub kind: ErrorKind,
    pub message: String,
}

impl ResourceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    pub fn unsupported_expression(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedExpressionType, message)
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("Key not found: {}", key.into()),
        )
    }

    pub fn execution(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Execution, message)
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Serialization, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

// JSON error conversions
impl From<serde_json::Error> for ResourceError {
    fn from(err: serde_json::Error) -> Self {
        ResourceError::serialization(format!("JSON error: {}", err)).with_source(err)
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ResourceError>;
