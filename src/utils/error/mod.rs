//! Error handling utilities

pub mod helpers;
pub mod types;

pub use types::{Result, ServiceError};
