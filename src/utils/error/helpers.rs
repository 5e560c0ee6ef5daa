//! Helper functions for creating specific error types

use super::types::ServiceError;

impl ServiceError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the error comes from configuration loading or validation
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::Config(_) | ServiceError::Validation(_) | ServiceError::Yaml(_)
        )
    }
}
