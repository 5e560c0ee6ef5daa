//! Utility modules for the coordination service
//!
//! ## Module Organization
//!
//! - **error**: Crate-level error type and `Result` alias
//! - **logging**: `tracing-subscriber` setup

pub mod error;
pub mod logging;

pub use error::{Result, ServiceError};
pub use logging::{LogFormat, LoggingConfig, init_logging};
