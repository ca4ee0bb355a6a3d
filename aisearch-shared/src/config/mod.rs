//! # Configuration
//!
//! Client configuration resolved from defaults, an optional YAML/JSON file,
//! environment variables and command-line overrides.

pub mod client;

pub use client::{ApiConfig, Config, ConfigError, LogFormat, LoggingConfig, SessionConfig};
