//! Logging setup
//!
//! The crate itself only emits `tracing` events; embedding applications
//! either install their own subscriber or call [`init_logging`].

pub mod subscriber;

pub use subscriber::{LogFormat, LoggingConfig, init_logging};
