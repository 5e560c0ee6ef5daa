//! Configuration validation
//!
//! - `coordinator_validators`: `Validate` impls for every configuration section
//! - `tests`: Test suite for all validators

mod coordinator_validators;

/// Validation for configuration sections
///
/// Errors are plain messages; `Config::validate` prefixes them with the
/// section name.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}
