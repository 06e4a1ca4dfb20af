//! Error types for Codelens.rs

use crate::types::Language;
use thiserror::Error;

/// Main error type for Codelens.rs operations
#[derive(Debug, Error)]
pub enum CodelensError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {kind} pattern for {language}: {message}")]
    Pattern {
        language: Language,
        kind: &'static str,
        message: String,
    },

    #[error("Analysis error: {message}")]
    Analysis { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Analysis task failed: {message}")]
    TaskJoin { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for Codelens operations
pub type Result<T> = std::result::Result<T, CodelensError>;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors raised by individual analysis passes
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Input of {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },
}

impl From<ConfigError> for CodelensError {
    fn from(error: ConfigError) -> Self {
        CodelensError::Config {
            message: error.to_string(),
        }
    }
}

impl From<config::ConfigError> for CodelensError {
    fn from(error: config::ConfigError) -> Self {
        CodelensError::Config {
            message: error.to_string(),
        }
    }
}

impl From<AnalysisError> for CodelensError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::InputTooLarge { .. } => CodelensError::InvalidInput {
                message: error.to_string(),
            },
        }
    }
}
