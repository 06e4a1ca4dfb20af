//! Core engine that orchestrates the analysis passes
//!
//! Each call fans the four passes out over a bounded worker budget, waits for all of them,
//! then assembles one report. A pass that fails or panics turns the whole report into the
//! degraded form.

use crate::analysis::{
    ImprovementKind, ImprovementPlan, Inspector, PatternInspector, SuggestionEngine,
};
use codelens_shared::{
    AnalysisReport, CodeSample, CodelensConfig, CodelensError, ComplexityMetrics, EngineConfig,
    Language, QualityMetrics, Result, SecurityFindings, StructureMetrics,
};
use std::any::Any;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tracing::{debug, info, instrument, warn};

/// Main engine for code analysis
///
/// The engine is cheap to share: clone the `Arc` it lives in, or call it from several tasks
/// at once. Every concurrent call draws from the same worker budget.
pub struct AnalysisEngine {
    /// The analysis passes
    inspector: Arc<dyn Inspector>,

    /// Suggestion rules and static catalogues
    suggestions: Arc<SuggestionEngine>,

    /// Worker budget shared by all calls on this engine
    workers: Arc<Semaphore>,

    /// Current configuration
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create a new engine from defaults and environment overrides
    #[instrument]
    pub fn new() -> Result<Self> {
        info!("Initializing analysis engine with default configuration");

        let config = CodelensConfig::load_with_env()?;
        Self::with_config(config.engine)
    }

    /// Create a new engine with the provided configuration
    #[instrument(skip(config))]
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        let inspector = Arc::new(PatternInspector::new(&config)?);
        Self::with_inspector(config, inspector)
    }

    /// Create an engine around a custom set of passes
    pub fn with_inspector(config: EngineConfig, inspector: Arc<dyn Inspector>) -> Result<Self> {
        config.validate()?;

        let workers = Arc::new(Semaphore::new(config.max_workers));
        info!("Analysis engine ready with {} workers", config.max_workers);

        Ok(Self {
            inspector,
            suggestions: Arc::new(SuggestionEngine::new()?),
            workers,
            config,
        })
    }

    /// Get the current configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze a sample. Never fails: a failing pass yields the degraded report.
    #[instrument(skip(self, sample), fields(language = %sample.language, bytes = sample.text.len()))]
    pub async fn analyze(&self, sample: CodeSample) -> AnalysisReport {
        let started = Instant::now();
        info!("Starting analysis");

        let sample = Arc::new(sample);
        let (structure, complexity, quality, security) = tokio::join!(
            self.run_pass("structure", &sample, |inspector, sample| inspector.structure(sample)),
            self.run_pass("complexity", &sample, |inspector, sample| inspector.complexity(sample)),
            self.run_pass("quality", &sample, |inspector, sample| inspector.quality(sample)),
            self.run_pass("security", &sample, |inspector, sample| inspector.security(sample)),
        );

        let report = match self.assemble(&sample, structure, complexity, quality, security) {
            Ok(report) => report,
            Err(e) => {
                warn!("Analysis degraded: {}", e);
                AnalysisReport::degraded(e.to_string(), self.best_practices(sample.language))
            }
        };

        info!(
            "Analysis finished in {}ms",
            started.elapsed().as_millis()
        );
        report
    }

    /// Complexity pass alone, errors returned as-is
    #[instrument(skip(self, sample), fields(language = %sample.language))]
    pub fn analyze_complexity_only(&self, sample: &CodeSample) -> Result<ComplexityMetrics> {
        debug!("Running complexity pass only");
        self.inspector.complexity(sample)
    }

    /// Best-practice list for a language
    pub fn best_practices(&self, language: Language) -> Vec<String> {
        self.suggestions.best_practices(language)
    }

    /// Static improvement plan for a focus area
    pub fn improvement_plan(&self, kind: ImprovementKind) -> ImprovementPlan {
        self.suggestions.improvement_plan(kind)
    }

    /// Run one pass on the blocking pool once a worker permit is available
    async fn run_pass<T, F>(&self, pass: &'static str, sample: &Arc<CodeSample>, run: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&dyn Inspector, &CodeSample) -> Result<T> + Send + 'static,
    {
        let permit = Arc::clone(&self.workers)
            .acquire_owned()
            .await
            .map_err(|e| CodelensError::Internal {
                message: format!("worker pool closed: {}", e),
            })?;

        let inspector = Arc::clone(&self.inspector);
        let sample = Arc::clone(sample);
        let started = Instant::now();

        let result = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            run(inspector.as_ref(), sample.as_ref())
        })
        .await
        .map_err(|e| join_error(pass, e))?;

        debug!(
            "{} pass finished in {}ms (ok: {})",
            pass,
            started.elapsed().as_millis(),
            result.is_ok()
        );
        result
    }

    /// Combine pass results; the first failure in field order wins
    fn assemble(
        &self,
        sample: &CodeSample,
        structure: Result<StructureMetrics>,
        complexity: Result<ComplexityMetrics>,
        quality: Result<QualityMetrics>,
        security: Result<SecurityFindings>,
    ) -> Result<AnalysisReport> {
        let structure = structure?;
        let complexity = complexity?;
        let quality = quality?;
        let security = security?;

        let suggestions =
            self.suggestions
                .suggest(&sample.text, sample.language, &quality, &complexity);

        Ok(AnalysisReport {
            code_quality: quality,
            complexity: Some(complexity),
            structure: Some(structure),
            potential_issues: security.issues.clone(),
            security: Some(security),
            suggestions,
            best_practices: self.best_practices(sample.language),
            error: None,
        })
    }
}

fn join_error(pass: &'static str, error: JoinError) -> CodelensError {
    let message = if error.is_panic() {
        format!("{} pass panicked: {}", pass, panic_message(error.into_panic()))
    } else {
        format!("{} pass was cancelled", pass)
    };

    CodelensError::TaskJoin { message }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
