//! Command handlers. Each returns the JSON text to print.

use anyhow::{Context, Result};
use codelens_core::analysis::profile::DEFAULT_LANGUAGE;
use codelens_core::{AnalysisEngine, CodeSample, ImprovementKind, Language};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

/// Analyze a file (or stdin) and render the report
pub async fn analyze(
    engine: &AnalysisEngine,
    path: Option<&Path>,
    language: Option<&str>,
    complexity_only: bool,
    pretty: bool,
) -> Result<String> {
    let text = read_source(path).await?;
    let language = resolve_language(language, path);
    info!("Analyzing {} bytes as {}", text.len(), language);

    let sample = CodeSample::new(text, language);
    if complexity_only {
        let metrics = engine
            .analyze_complexity_only(&sample)
            .context("Complexity analysis failed")?;
        return to_json(&metrics, pretty);
    }

    let report = engine.analyze(sample).await;
    to_json(&report, pretty)
}

/// Best-practice list for a language tag
pub fn practices(engine: &AnalysisEngine, language: &str) -> Result<String> {
    to_json(&engine.best_practices(Language::from_tag(language)), true)
}

/// Static improvement plan
pub fn improve(engine: &AnalysisEngine, kind: ImprovementKind) -> Result<String> {
    to_json(&engine.improvement_plan(kind), true)
}

async fn read_source(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => {
            debug!("Reading source from {}", path.display());
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))
        }
        _ => {
            debug!("Reading source from stdin");
            let mut text = String::new();
            tokio::io::stdin()
                .read_to_string(&mut text)
                .await
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// An explicit tag always wins, even an unrecognised one. Otherwise the extension decides,
/// falling back to the default language.
fn resolve_language(tag: Option<&str>, path: Option<&Path>) -> Language {
    if let Some(tag) = tag {
        return Language::from_tag(tag);
    }

    path.and_then(|path| path.extension())
        .and_then(|ext| ext.to_str())
        .map(Language::from_extension)
        .filter(|language| *language != Language::Unknown)
        .unwrap_or(DEFAULT_LANGUAGE)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value).context("Failed to serialize JSON")
    } else {
        serde_json::to_string(value).context("Failed to serialize JSON")
    }
}
