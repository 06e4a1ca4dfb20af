//! Cyclomatic complexity and nesting depth estimation
//!
//! Counts are surface-level: keywords are matched against the raw text, so strings and
//! comments containing keywords are counted too. The numbers are estimates, not a
//! control-flow graph.

use crate::analysis::profile::{count_matches, BlockStyle, LanguageProfile, ProfileRegistry};
use codelens_shared::{ComplexityMetrics, Language};

/// Indentation width assumed for indentation-significant languages
const INDENT_WIDTH: usize = 4;

/// Estimate complexity for a snippet
pub fn analyze_complexity(
    code: &str,
    language: Language,
    registry: &ProfileRegistry,
) -> ComplexityMetrics {
    match registry.lookup(language) {
        Some(profile) => profiled_complexity(code, profile),
        None => coarse_complexity(code, registry),
    }
}

fn profiled_complexity(code: &str, profile: &LanguageProfile) -> ComplexityMetrics {
    let conditions = count_matches(&profile.conditions, code);
    let loops = count_matches(&profile.loops, code);
    let tries = count_matches(&profile.try_blocks, code);
    let functions = profile.function.find_iter(code).count();

    let nesting = match profile.block_style() {
        BlockStyle::Indentation => indentation_depth(code),
        BlockStyle::Braces => brace_depth(code),
    };

    ComplexityMetrics::from_counts(conditions, loops, tries, functions, nesting)
}

fn coarse_complexity(code: &str, registry: &ProfileRegistry) -> ComplexityMetrics {
    let coarse = registry.coarse();
    let conditions = coarse.conditions.find_iter(code).count();
    let loops = coarse.loops.find_iter(code).count();

    ComplexityMetrics::from_counts(conditions, loops, 0, 0, brace_depth(code))
}

/// Deepest indentation level over non-blank lines
pub fn indentation_depth(code: &str) -> usize {
    code.split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let indent = line.chars().take_while(|c| c.is_whitespace()).count();
            indent / INDENT_WIDTH
        })
        .max()
        .unwrap_or(0)
}

/// Highest cumulative brace balance reached at the end of any non-blank line
pub fn brace_depth(code: &str) -> usize {
    let mut depth: i64 = 0;
    let mut max_depth: i64 = 0;

    for line in code.split('\n').filter(|line| !line.trim().is_empty()) {
        let opens = line.matches('{').count() as i64;
        let closes = line.matches('}').count() as i64;
        depth += opens - closes;
        max_depth = max_depth.max(depth);
    }

    max_depth as usize
}
