//! Core module - shared infrastructure for Muster
//!
//! This module contains foundational types, configuration, and error handling
//! used throughout the application.

pub mod config;
pub mod error;
pub mod types;

pub use config::{BrowserConfig, Config, LlmConfig, PoolConfig, TelemetryConfig};
pub use error::{MusterError, Result};
pub use types::*;
