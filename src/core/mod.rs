//! Core functionality for the coordination service
//!
//! This module contains the request coordinator and the health monitor that
//! runs beside it.

pub mod coordinator;
pub mod health; // Health monitoring system
