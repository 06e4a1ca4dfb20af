//! Structure extraction: functions, classes, imports, comments and line totals.

use crate::analysis::profile::LanguageProfile;
use codelens_shared::{EngineConfig, StructureMetrics};
use regex::Regex;

/// Caps on the name excerpts included in a structure report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameLimits {
    pub functions: usize,
    pub classes: usize,
}

impl Default for NameLimits {
    fn default() -> Self {
        Self {
            functions: 10,
            classes: 5,
        }
    }
}

impl From<&EngineConfig> for NameLimits {
    fn from(config: &EngineConfig) -> Self {
        Self {
            functions: config.max_function_names,
            classes: config.max_class_names,
        }
    }
}

/// Extract structural counts and name excerpts
pub fn analyze_structure(
    code: &str,
    profile: &LanguageProfile,
    limits: &NameLimits,
) -> StructureMetrics {
    let (function_count, function_names) = collect_names(&profile.function, code, limits.functions);
    let (class_count, class_names) = collect_names(&profile.class, code, limits.classes);
    let import_count = profile.import.find_iter(code).count();

    let total_lines = line_count(code);
    // A block comment spanning n newlines covers n + 1 lines. Two comments sharing a
    // line would otherwise push the ratio past 1.
    let comment_lines = profile
        .comment
        .find_iter(code)
        .map(|m| m.as_str().matches('\n').count() + 1)
        .sum::<usize>()
        .min(total_lines);

    let comment_ratio = if total_lines > 0 {
        comment_lines as f64 / total_lines as f64
    } else {
        0.0
    };

    StructureMetrics {
        total_lines,
        comment_lines,
        comment_ratio,
        function_count,
        class_count,
        import_count,
        function_names,
        class_names,
    }
}

/// Number of `\n`-separated segments; never zero
pub(crate) fn line_count(code: &str) -> usize {
    code.split('\n').count()
}

/// Count every match and keep the first `limit` names
fn collect_names(pattern: &Regex, code: &str, limit: usize) -> (usize, Vec<String>) {
    let mut count = 0;
    let mut names = Vec::new();

    for caps in pattern.captures_iter(code) {
        count += 1;
        if names.len() < limit {
            let name = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .or_else(|| caps.get(0))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            names.push(name);
        }
    }

    (count, names)
}
