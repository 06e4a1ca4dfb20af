//! Property-based tests for the analysis passes.

use codelens_core::{
    CodeSample, EngineConfig, Inspector, Language, PatternInspector, RiskLevel,
};
use proptest::prelude::*;
use std::sync::LazyLock;

static INSPECTOR: LazyLock<PatternInspector> = LazyLock::new(|| {
    PatternInspector::new(&EngineConfig::default()).expect("built-in profiles compile")
});

fn any_language() -> impl Strategy<Value = Language> {
    prop_oneof![
        Just(Language::Python),
        Just(Language::JavaScript),
        Just(Language::TypeScript),
        Just(Language::Java),
        Just(Language::Unknown),
    ]
}

const SNIPPETS: &[&str] = &[
    "def f(x):",
    "    if x:",
    "    else:",
    "for i in range(3):",
    "try:",
    "except:",
    "# comment",
    "\"\"\"",
    "/* open",
    "close */",
    "// note",
    "function g() {",
    "} else {",
    "}",
    "a ? b : c?.d ?? e",
    "password = \"secret\"",
    "eval(x); el.innerHTML = y;",
    "pickle.loads(data)",
];

/// Lines biased towards the constructs the profiles look for
fn code_line() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(SNIPPETS).prop_map(String::from),
        "\\PC{0,120}",
    ]
}

fn code() -> impl Strategy<Value = String> {
    prop::collection::vec(code_line(), 0..40).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn structure_lines_and_ratio_are_bounded(text in code(), language in any_language()) {
        let sample = CodeSample::new(text, language);
        let structure = INSPECTOR.structure(&sample).unwrap();

        prop_assert!(structure.total_lines >= 1);
        prop_assert!(structure.comment_lines <= structure.total_lines);
        prop_assert!((0.0..=1.0).contains(&structure.comment_ratio));
        prop_assert!(structure.function_names.len() <= 10);
        prop_assert!(structure.class_names.len() <= 5);
    }

    #[test]
    fn cyclomatic_complexity_is_at_least_one(text in code(), language in any_language()) {
        let metrics = INSPECTOR.complexity(&CodeSample::new(text, language)).unwrap();

        prop_assert!(metrics.cyclomatic_complexity >= 1);
        prop_assert_eq!(
            metrics.cyclomatic_complexity,
            1 + metrics.condition_count + metrics.loop_count + metrics.try_count
        );
    }

    #[test]
    fn risk_is_high_iff_more_than_two_issues(text in code(), language in any_language()) {
        let findings = INSPECTOR.security(&CodeSample::new(text, language)).unwrap();

        prop_assert_eq!(findings.risk_level == RiskLevel::High, findings.issues.len() > 2);
        prop_assert_eq!(findings.risk_level == RiskLevel::Low, findings.issues.is_empty());
    }

    #[test]
    fn long_line_ratio_is_bounded(text in code(), language in any_language()) {
        let quality = INSPECTOR.quality(&CodeSample::new(text, language)).unwrap();
        let signals = quality.metrics.unwrap();

        prop_assert!((0.0..=1.0).contains(&signals.long_line_ratio));
    }

    #[test]
    fn passes_are_idempotent(text in code(), language in any_language()) {
        let sample = CodeSample::new(text, language);

        prop_assert_eq!(INSPECTOR.structure(&sample).unwrap(), INSPECTOR.structure(&sample).unwrap());
        prop_assert_eq!(INSPECTOR.complexity(&sample).unwrap(), INSPECTOR.complexity(&sample).unwrap());
        prop_assert_eq!(INSPECTOR.quality(&sample).unwrap(), INSPECTOR.quality(&sample).unwrap());
        prop_assert_eq!(INSPECTOR.security(&sample).unwrap(), INSPECTOR.security(&sample).unwrap());
    }

    #[test]
    fn any_tag_parses(tag in "\\PC{0,12}") {
        let language: Language = tag.parse().unwrap();
        prop_assert_eq!(Language::from_tag(language.tag()), language);
    }
}
