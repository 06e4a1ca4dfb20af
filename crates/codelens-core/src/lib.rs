//! # Codelens Core
//!
//! Concurrent multi-metric static analysis for source snippets.
//!
//! This crate provides the analysis engine and its passes:
//! - Per-language pattern profiles
//! - Structure, complexity, quality and security analysis
//! - Suggestions, best practices and improvement plans
//! - A bounded worker pool with graceful degradation on failure
//!
//! ```no_run
//! use codelens_core::{AnalysisEngine, CodeSample, Language};
//!
//! # async fn run() -> codelens_core::Result<()> {
//! let engine = AnalysisEngine::new()?;
//! let report = engine
//!     .analyze(CodeSample::new("def f(a, b):\n    return a + b\n", Language::Python))
//!     .await;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod engine;

// Re-export commonly used types
pub use codelens_shared::*;

pub use analysis::{
    ImprovementKind, ImprovementPlan, Inspector, PatternInspector, ProfileRegistry,
    SecurityScanner, SuggestionEngine,
};
pub use engine::AnalysisEngine;
