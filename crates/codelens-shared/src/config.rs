//! Configuration management for Codelens.rs

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `CODELENS__ENGINE__MAX_WORKERS=8`
pub const ENV_PREFIX: &str = "CODELENS";

/// Upper bound for `engine.max_function_names`
pub const MAX_FUNCTION_NAMES: usize = 10;

/// Upper bound for `engine.max_class_names`
pub const MAX_CLASS_NAMES: usize = 5;

/// Main configuration structure for Codelens.rs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodelensConfig {
    /// Analysis engine settings
    pub engine: EngineConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Analysis engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Width of the analysis worker pool
    pub max_workers: usize,

    /// Maximum function names listed in a structure report
    pub max_function_names: usize,

    /// Maximum class names listed in a structure report
    pub max_class_names: usize,

    /// Trimmed line length above which a line counts as long
    pub long_line_threshold: usize,

    /// Reject samples larger than this many bytes
    pub max_input_bytes: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            max_function_names: MAX_FUNCTION_NAMES,
            max_class_names: MAX_CLASS_NAMES,
            long_line_threshold: 100,
            max_input_bytes: None,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.max_workers".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.long_line_threshold == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.long_line_threshold".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.max_function_names > MAX_FUNCTION_NAMES {
            return Err(ConfigError::InvalidValue {
                key: "engine.max_function_names".to_string(),
                value: self.max_function_names.to_string(),
            }
            .into());
        }

        if self.max_class_names > MAX_CLASS_NAMES {
            return Err(ConfigError::InvalidValue {
                key: "engine.max_class_names".to_string(),
                value: self.max_class_names.to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level filter when RUST_LOG is unset
    pub level: String,

    /// Emit JSON formatted log lines
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl CodelensConfig {
    /// Load configuration from a TOML file, with environment overrides applied on top
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        Self::load(Some(path))
    }

    /// Load defaults with environment overrides only
    pub fn load_with_env() -> Result<Self> {
        Self::load(None)
    }

    /// Search the usual locations and load the first file found
    pub fn discover() -> Result<Self> {
        match Self::search_paths().into_iter().find(|path| path.exists()) {
            Some(path) => Self::load(Some(&path)),
            None => Self::load_with_env(),
        }
    }

    fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        let config: CodelensConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }

    /// Save configuration as TOML
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat {
            message: e.to_string(),
        })?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Configuration search paths, in order of preference
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./codelens.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("codelens").join("codelens.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".codelens.toml"));
        }

        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = CodelensConfig::default();
        assert_eq!(config.engine.max_workers, 4);
        assert_eq!(config.engine.max_function_names, 10);
        assert_eq!(config.engine.max_class_names, 5);
        assert_eq!(config.engine.long_line_threshold, 100);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("codelens.toml");

        let mut config = CodelensConfig::default();
        config.engine.max_workers = 2;
        config.engine.max_input_bytes = Some(4096);
        config.save_to_file(&path).unwrap();

        let loaded = CodelensConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.engine.max_workers, 2);
        assert_eq!(loaded.engine.max_input_bytes, Some(4096));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("codelens.toml");
        std::fs::write(&path, "[engine]\nlong_line_threshold = 120\n").unwrap();

        let loaded = CodelensConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.engine.long_line_threshold, 120);
        assert_eq!(loaded.engine.max_workers, 4);
        assert!(!loaded.logging.json);
    }

    #[test]
    fn test_missing_file() {
        let err = CodelensConfig::load_from_file(Path::new("/nonexistent/codelens.toml"));
        assert!(err.is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = CodelensConfig::default();
        config.engine.max_workers = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine.max_workers"));
    }

    #[test]
    fn test_name_caps_bounded() {
        let mut config = CodelensConfig::default();
        config.engine.max_function_names = MAX_FUNCTION_NAMES;
        config.engine.max_class_names = 0;
        assert!(config.validate().is_ok());

        config.engine.max_function_names = 50;
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Invalid configuration value for engine.max_function_names: 50"
        );

        config.engine.max_function_names = 1;
        config.engine.max_class_names = MAX_CLASS_NAMES + 1;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("engine.max_class_names: 6"));
    }
}
