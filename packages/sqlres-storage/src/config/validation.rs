//! Configuration validation

use super::error::ConfigResult;

/// Semantic checks that serde alone cannot express
pub trait Validatable {
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl<T: Validatable> Validatable for Vec<T> {
    fn validate(&self) -> ConfigResult<()> {
        self.iter().try_for_each(Validatable::validate)
    }
}

impl<T: Validatable> Validatable for Option<T> {
    fn validate(&self) -> ConfigResult<()> {
        match self {
            Some(config) => config.validate(),
            None => Ok(()),
        }
    }
}
