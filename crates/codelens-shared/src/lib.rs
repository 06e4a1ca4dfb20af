//! # Codelens Shared
//!
//! Shared types, errors and configuration for Codelens.
//! This crate provides the foundation types used across all Codelens components.

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use crate::config::*;
pub use crate::error::*;
pub use crate::types::*;

/// Version information for Codelens.rs
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
