//! Builders
//!
//! Fluent builder for Santander configuration.

pub mod config;

pub use config::{santander_config, SantanderConfigBuilder};
