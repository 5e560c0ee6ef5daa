//! Error types for the coordination service

use crate::core::coordinator::error::CoordinationError;
use thiserror::Error;

/// Result type alias for service setup and management operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Crate-level error for configuration, registration and setup
///
/// Request-path failures are `CoordinationError`; this type covers
/// everything around it.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A provider with this id is already registered
    #[error("Duplicate provider: {0}")]
    DuplicateProvider(String),

    /// A configured provider has no executor
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logging setup errors
    #[error("Logging error: {0}")]
    Logging(String),

    /// Coordination errors surfaced through service-level APIs
    #[error("Coordination error: {0}")]
    Coordination(#[from] CoordinationError),
}
