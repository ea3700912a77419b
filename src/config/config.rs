//! Configuration structures for the RESO validation host.
//!
//! Every setting can come from a TOML file, the command line, or both; the
//! command line wins.
//!
//! # Example TOML
//! ```toml
//! [validator]
//! path = "target/wasm32-unknown-unknown/release/listing_validator.wasm"
//!
//! [records]
//! current = "listing.json"
//! previous = "listing.previous.json"
//!
//! [runtime]
//! fuel = 50_000_000
//! max_memory_bytes = 16_777_216
//! verbose = 1
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main configuration structure
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validator: ValidatorSettings,
    #[serde(default)]
    pub records: RecordSettings,
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

/// Which module to run
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ValidatorSettings {
    /// Path to the `.wasm` file
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Name used in logs (defaults to the file stem)
    #[serde(default)]
    pub name: Option<String>,
}

/// Record files to validate
#[derive(Debug, Default, Deserialize, Clone)]
pub struct RecordSettings {
    /// JSON file with the record being saved
    #[serde(default)]
    pub current: Option<PathBuf>,

    /// JSON file with the previously persisted record; absent for new records
    #[serde(default)]
    pub previous: Option<PathBuf>,
}

/// Sandbox limits applied to every invocation
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RuntimeSettings {
    /// Instruction budget per invocation
    #[serde(default = "default_fuel")]
    pub fuel: u64,

    /// Linear memory cap per instance
    #[serde(default = "default_max_memory_bytes")]
    pub max_memory_bytes: usize,

    /// 0: report only, 1: module diagnostics, 2: every host call
    #[serde(default)]
    pub verbose: u8,
}

fn default_fuel() -> u64 {
    100_000_000
}

fn default_max_memory_bytes() -> usize {
    64 * 1024 * 1024 // 64 MiB
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            fuel: default_fuel(),
            max_memory_bytes: default_max_memory_bytes(),
            verbose: 0,
        }
    }
}

/// Configuration loading or validation failure
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing setting: {0}")]
    Missing(&'static str),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Check that everything needed to run is present and sane
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.validator.path.is_none() {
            return Err(ConfigError::Missing("validator.path"));
        }
        if self.records.current.is_none() {
            return Err(ConfigError::Missing("records.current"));
        }
        if self.runtime.fuel == 0 {
            return Err(ConfigError::Invalid("runtime.fuel must be greater than 0".to_string()));
        }
        if self.runtime.max_memory_bytes < 64 * 1024 {
            return Err(ConfigError::Invalid(
                "runtime.max_memory_bytes must allow at least one 64 KiB page".to_string(),
            ));
        }
        Ok(())
    }

    /// Name to log the validator under
    pub fn validator_name(&self) -> String {
        if let Some(name) = &self.validator.name {
            return name.clone();
        }
        self.validator
            .path
            .as_ref()
            .and_then(|path| path.file_stem())
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "validator".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
[validator]
path = "listing_validator.wasm"

[records]
current = "listing.json"
previous = "previous.json"

[runtime]
fuel = 5000
verbose = 2
"#;

        let config = Config::from_toml(toml_str).unwrap();
        assert_eq!(config.validator.path, Some(PathBuf::from("listing_validator.wasm")));
        assert_eq!(config.records.previous, Some(PathBuf::from("previous.json")));
        assert_eq!(config.runtime.fuel, 5000);
        assert_eq!(config.runtime.max_memory_bytes, 64 * 1024 * 1024);
        assert_eq!(config.runtime.verbose, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.runtime, RuntimeSettings::default());
        assert!(config.records.previous.is_none());
    }

    #[test]
    fn test_missing_module_path() {
        let config = Config::from_toml("[records]\ncurrent = \"listing.json\"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("validator.path"))));
    }

    #[test]
    fn test_missing_current_record() {
        let config = Config::from_toml("[validator]\npath = \"v.wasm\"\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing("records.current"))));
    }

    #[test]
    fn test_zero_fuel_is_invalid() {
        let toml_str = r#"
[validator]
path = "v.wasm"
[records]
current = "listing.json"
[runtime]
fuel = 0
"#;
        let config = Config::from_toml(toml_str).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[runtime]\nfuel = \"lots\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[validator]\npath = \"/modules/listing_validator.wasm\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.validator_name(), "listing_validator");
    }

    #[test]
    fn test_from_missing_file() {
        let err = Config::from_file("/nonexistent/reso-host.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_name_wins() {
        let config =
            Config::from_toml("[validator]\npath = \"a.wasm\"\nname = \"listing\"\n").unwrap();
        assert_eq!(config.validator_name(), "listing");
    }
}
