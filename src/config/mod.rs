//! Configuration module.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - CLI argument parsing and merging
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{Config, OptionsConfig, RedditConfig};
pub use validation::validate_config;
