//! Maintainability and readability ratings derived from comment density, exception
//! handling and line length.

use crate::analysis::profile::LanguageProfile;
use crate::analysis::structure::line_count;
use codelens_shared::{QualityMetrics, QualitySignals, Rating, StructureMetrics};

/// Rate a snippet. `structure` must come from the same code and profile.
pub fn analyze_quality(
    code: &str,
    structure: &StructureMetrics,
    profile: &LanguageProfile,
    long_line_threshold: usize,
) -> QualityMetrics {
    let signals = QualitySignals {
        comment_ratio: structure.comment_ratio,
        has_exception_handling: profile.exception.is_match(code),
        long_line_ratio: long_line_ratio(code, long_line_threshold),
    };

    QualityMetrics {
        maintainability: maintainability(&signals),
        readability: readability(&signals),
        efficiency: Rating::Good,
        metrics: Some(signals),
    }
}

/// Share of all lines whose trimmed length exceeds `threshold` characters
pub fn long_line_ratio(code: &str, threshold: usize) -> f64 {
    let long_lines = code
        .split('\n')
        .filter(|line| line.trim().chars().count() > threshold)
        .count();

    long_lines as f64 / line_count(code) as f64
}

fn maintainability(signals: &QualitySignals) -> Rating {
    let QualitySignals {
        comment_ratio: ratio,
        has_exception_handling: exceptions,
        long_line_ratio: long,
    } = *signals;

    if ratio >= 0.2 && exceptions && long < 0.1 {
        Rating::Excellent
    } else if ratio >= 0.1 && exceptions && long < 0.2 {
        Rating::Good
    } else if ratio >= 0.05 && long < 0.3 {
        Rating::Medium
    } else {
        Rating::NeedsImprovement
    }
}

fn readability(signals: &QualitySignals) -> Rating {
    let ratio = signals.comment_ratio;
    let long = signals.long_line_ratio;

    if ratio >= 0.15 && long < 0.1 {
        Rating::Excellent
    } else if ratio >= 0.1 && long < 0.15 {
        Rating::Good
    } else if ratio >= 0.05 && long < 0.25 {
        Rating::Medium
    } else {
        Rating::NeedsImprovement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::profile::ProfileRegistry;
    use crate::analysis::structure::{analyze_structure, NameLimits};
    use codelens_shared::Language;

    fn quality(code: &str, language: Language) -> QualityMetrics {
        let registry = ProfileRegistry::new().unwrap();
        let profile = registry.profile_for(language);
        let structure = analyze_structure(code, profile, &NameLimits::default());
        analyze_quality(code, &structure, profile, 100)
    }

    fn signals(comment_ratio: f64, has_exception_handling: bool, long_line_ratio: f64) -> QualitySignals {
        QualitySignals {
            comment_ratio,
            has_exception_handling,
            long_line_ratio,
        }
    }

    #[test]
    fn test_maintainability_ladder() {
        assert_eq!(maintainability(&signals(0.25, true, 0.0)), Rating::Excellent);
        assert_eq!(maintainability(&signals(0.25, false, 0.0)), Rating::Medium);
        assert_eq!(maintainability(&signals(0.12, true, 0.15)), Rating::Good);
        assert_eq!(maintainability(&signals(0.05, false, 0.29)), Rating::Medium);
        assert_eq!(maintainability(&signals(0.04, true, 0.0)), Rating::NeedsImprovement);
        assert_eq!(maintainability(&signals(0.5, true, 0.3)), Rating::NeedsImprovement);
    }

    #[test]
    fn test_readability_ladder() {
        assert_eq!(readability(&signals(0.15, false, 0.05)), Rating::Excellent);
        assert_eq!(readability(&signals(0.1, false, 0.12)), Rating::Good);
        assert_eq!(readability(&signals(0.3, false, 0.2)), Rating::Medium);
        assert_eq!(readability(&signals(0.0, true, 0.0)), Rating::NeedsImprovement);
    }

    #[test]
    fn test_well_commented_python() {
        let code = r#"# Parse a config value
def parse(value):
    # Strip whitespace first
    try:
        return int(value.strip())
    except ValueError:
        return None
"#;

        let metrics = quality(code, Language::Python);
        let signals = metrics.metrics.unwrap();
        assert!(signals.has_exception_handling);
        assert_eq!(signals.long_line_ratio, 0.0);
        assert_eq!(metrics.maintainability, Rating::Excellent);
        assert_eq!(metrics.readability, Rating::Excellent);
        assert_eq!(metrics.efficiency, Rating::Good);
    }

    #[test]
    fn test_long_lines_counted_against_all_lines() {
        let long = "x".repeat(150);
        let code = format!("a\n{}\nb\n   {}   ", long, "y".repeat(100));
        // one long line out of four; the padded one trims to exactly 100
        assert_eq!(long_line_ratio(&code, 100), 0.25);
    }

    #[test]
    fn test_java_exception_detection() {
        let code = "class A {\n  void run() {\n    try (var in = open()) {\n    }\n  }\n}\n";
        let metrics = quality(code, Language::Java);
        assert!(metrics.metrics.unwrap().has_exception_handling);
    }
}
