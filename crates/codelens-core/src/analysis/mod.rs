//! Code Analysis
//!
//! This module provides the individual analysis passes:
//! - Language profiles (compiled per-language pattern sets)
//! - Structure extraction
//! - Complexity estimation
//! - Quality rating
//! - Security scanning
//! - Suggestions, best practices and improvement plans
//!
//! The passes the engine schedules concurrently sit behind the [`Inspector`] trait.

pub mod complexity;
pub mod profile;
pub mod quality;
pub mod security;
pub mod structure;
pub mod suggestions;

// Re-export main types
pub use complexity::analyze_complexity;
pub use profile::{BlockStyle, LanguageProfile, ProfilePatterns, ProfileRegistry};
pub use quality::analyze_quality;
pub use security::SecurityScanner;
pub use structure::{analyze_structure, NameLimits};
pub use suggestions::{ImprovementKind, ImprovementPlan, SuggestionEngine};

use codelens_shared::{
    AnalysisError, CodeSample, ComplexityMetrics, EngineConfig, QualityMetrics, Result,
    SecurityFindings, StructureMetrics,
};
use std::sync::Arc;

/// The four analysis passes over one sample
///
/// Implementations must be pure with respect to the sample: identical input yields
/// identical output, and no pass observes another.
#[cfg_attr(test, mockall::automock)]
pub trait Inspector: Send + Sync {
    fn structure(&self, sample: &CodeSample) -> Result<StructureMetrics>;

    fn complexity(&self, sample: &CodeSample) -> Result<ComplexityMetrics>;

    fn quality(&self, sample: &CodeSample) -> Result<QualityMetrics>;

    fn security(&self, sample: &CodeSample) -> Result<SecurityFindings>;
}

/// Pattern-driven inspector backed by the language profile registry
#[derive(Debug, Clone)]
pub struct PatternInspector {
    /// Compiled language profiles
    registry: Arc<ProfileRegistry>,

    /// Security signature catalogue
    scanner: Arc<SecurityScanner>,

    /// Caps on reported name excerpts
    limits: NameLimits,

    /// Trimmed length above which a line counts as long
    long_line_threshold: usize,

    /// Optional cap on input size
    max_input_bytes: Option<usize>,
}

impl PatternInspector {
    /// Build an inspector with freshly compiled built-in profiles
    pub fn new(config: &EngineConfig) -> Result<Self> {
        Self::with_registry(Arc::new(ProfileRegistry::new()?), config)
    }

    /// Build an inspector over an existing registry
    pub fn with_registry(registry: Arc<ProfileRegistry>, config: &EngineConfig) -> Result<Self> {
        Ok(Self {
            registry,
            scanner: Arc::new(SecurityScanner::new()?),
            limits: NameLimits::from(config),
            long_line_threshold: config.long_line_threshold,
            max_input_bytes: config.max_input_bytes,
        })
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    fn check_size(&self, sample: &CodeSample) -> Result<()> {
        match self.max_input_bytes {
            Some(limit) if sample.text.len() > limit => Err(AnalysisError::InputTooLarge {
                size: sample.text.len(),
                limit,
            }
            .into()),
            _ => Ok(()),
        }
    }
}

impl Inspector for PatternInspector {
    fn structure(&self, sample: &CodeSample) -> Result<StructureMetrics> {
        self.check_size(sample)?;
        let profile = self.registry.profile_for(sample.language);
        Ok(analyze_structure(&sample.text, profile, &self.limits))
    }

    fn complexity(&self, sample: &CodeSample) -> Result<ComplexityMetrics> {
        self.check_size(sample)?;
        Ok(analyze_complexity(&sample.text, sample.language, &self.registry))
    }

    fn quality(&self, sample: &CodeSample) -> Result<QualityMetrics> {
        self.check_size(sample)?;
        let profile = self.registry.profile_for(sample.language);
        let structure = analyze_structure(&sample.text, profile, &self.limits);
        Ok(analyze_quality(
            &sample.text,
            &structure,
            profile,
            self.long_line_threshold,
        ))
    }

    fn security(&self, sample: &CodeSample) -> Result<SecurityFindings> {
        self.check_size(sample)?;
        Ok(self.scanner.scan(&sample.text, sample.language))
    }
}
