//! Configuration module for the RESO validation host.
//!
//! This module handles loading the TOML configuration file and merging
//! command-line overrides into it.

mod config;

pub use config::{Config, ConfigError, RuntimeSettings};
