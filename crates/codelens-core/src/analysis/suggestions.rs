//! Suggestion Engine
//!
//! Turns quality and complexity metrics into ordered, human-readable suggestions, and
//! serves the static best-practice lists and improvement plans.

use crate::analysis::profile::compile_pattern;
use codelens_shared::{
    CodelensError, ComplexityMetrics, Language, QualityMetrics, Result,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const ADD_COMMENTS: &str = "Add comments to improve readability and maintainability";
pub const ADD_EXCEPTION_HANDLING: &str =
    "Add appropriate exception handling to make the code more robust";
pub const SHORTEN_LINES: &str = "Shorten long lines; keep each line within 100 characters";
pub const SPLIT_FUNCTIONS: &str =
    "Reduce complexity by splitting large functions into smaller ones";
pub const FLATTEN_NESTING: &str = "Reduce nesting depth; deeply nested code is hard to follow";
pub const CATCH_SPECIFIC: &str =
    "Avoid catching every exception; catch specific exception types instead";
pub const ADD_TYPE_HINTS: &str = "Consider adding type hints to improve readability";
pub const AVOID_VAR: &str = "Use let and const instead of var to avoid hoisting surprises";
pub const PREFER_ASYNC: &str = "Consider async/await instead of promise chains";

const COMMON_PRACTICES: [&str; 3] = [
    "Write clear documentation and comments",
    "Follow a consistent code style",
    "Write unit tests to protect code quality",
];

const PYTHON_PRACTICES: [&str; 4] = [
    "Follow the PEP 8 style guide",
    "Use type hints to make intent explicit",
    "Manage dependencies in a virtual environment",
    "Use list comprehensions for concise transformations",
];

const JAVASCRIPT_PRACTICES: [&str; 4] = [
    "Use ESLint to keep code quality consistent",
    "Prefer const and let over var",
    "Use destructuring to simplify code",
    "Split code into modules for maintainability",
];

const JAVA_PRACTICES: [&str; 4] = [
    "Follow the Java code conventions",
    "Apply design patterns to recurring problems",
    "Avoid over-engineering",
    "Use the Stream API for collection processing",
];

const COMPLEXITY_LIMIT: usize = 10;
const NESTING_LIMIT: usize = 3;

/// Focus area for an improvement plan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImprovementKind {
    #[default]
    General,
    Performance,
    Readability,
    Security,
}

impl ImprovementKind {
    pub const ALL: [ImprovementKind; 4] = [
        ImprovementKind::General,
        ImprovementKind::Performance,
        ImprovementKind::Readability,
        ImprovementKind::Security,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImprovementKind::General => "general",
            ImprovementKind::Performance => "performance",
            ImprovementKind::Readability => "readability",
            ImprovementKind::Security => "security",
        }
    }
}

impl FromStr for ImprovementKind {
    type Err = CodelensError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_lowercase();
        ImprovementKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CodelensError::InvalidInput {
                message: format!(
                    "unknown improvement kind '{}', expected one of: general, performance, readability, security",
                    s
                ),
            })
    }
}

impl fmt::Display for ImprovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static improvement plan for one focus area
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImprovementPlan {
    pub kind: ImprovementKind,
    pub explanation: String,
    pub points: Vec<String>,
}

/// Rule-based suggestion generator
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    /// A `def` with an annotated return type
    type_hint: Regex,
    /// `async` used as a keyword
    async_usage: Regex,
}

impl SuggestionEngine {
    pub fn new() -> Result<Self> {
        Ok(Self {
            type_hint: compile_pattern(
                Language::Python,
                "type hint",
                r"def\s+\w+\s*\([^)]*\)\s*->\s*[^:\n]+:",
            )?,
            async_usage: compile_pattern(Language::JavaScript, "async", r"\basync\s+")?,
        })
    }

    /// Suggestions in fixed rule order. Degraded quality (no signals) reads as zero comments
    /// and no exception handling.
    pub fn suggest(
        &self,
        code: &str,
        language: Language,
        quality: &QualityMetrics,
        complexity: &ComplexityMetrics,
    ) -> Vec<String> {
        let mut suggestions = Vec::new();

        let (comment_ratio, has_exceptions, long_line_ratio) = quality
            .metrics
            .as_ref()
            .map(|m| (m.comment_ratio, m.has_exception_handling, m.long_line_ratio))
            .unwrap_or((0.0, false, 0.0));

        if comment_ratio < 0.1 {
            suggestions.push(ADD_COMMENTS);
        }
        if !has_exceptions {
            suggestions.push(ADD_EXCEPTION_HANDLING);
        }
        if long_line_ratio > 0.2 {
            suggestions.push(SHORTEN_LINES);
        }
        if complexity.cyclomatic_complexity > COMPLEXITY_LIMIT {
            suggestions.push(SPLIT_FUNCTIONS);
        }
        if complexity.max_nesting_depth > NESTING_LIMIT {
            suggestions.push(FLATTEN_NESTING);
        }

        if language == Language::Python {
            if code.contains("except:") || code.contains("except Exception:") {
                suggestions.push(CATCH_SPECIFIC);
            }
            if !self.type_hint.is_match(code) {
                suggestions.push(ADD_TYPE_HINTS);
            }
        } else if language.is_ecmascript() {
            if code.contains("var ") {
                suggestions.push(AVOID_VAR);
            }
            let chains_promises = code.contains("then(") || code.contains("catch(");
            if chains_promises && !self.async_usage.is_match(code) {
                suggestions.push(PREFER_ASYNC);
            }
        }

        suggestions.into_iter().map(String::from).collect()
    }

    /// Common baseline followed by the language's own list
    pub fn best_practices(&self, language: Language) -> Vec<String> {
        let specific: &[&str] = match language {
            Language::Python => &PYTHON_PRACTICES,
            Language::JavaScript | Language::TypeScript => &JAVASCRIPT_PRACTICES,
            Language::Java => &JAVA_PRACTICES,
            Language::Unknown => &[],
        };

        COMMON_PRACTICES
            .iter()
            .chain(specific)
            .map(|practice| practice.to_string())
            .collect()
    }

    pub fn improvement_plan(&self, kind: ImprovementKind) -> ImprovementPlan {
        let (explanation, points): (&str, [&str; 3]) = match kind {
            ImprovementKind::General => (
                "Descriptive names and well-placed comments make code easier to read and maintain.",
                [
                    "Use more descriptive variable names",
                    "Add comments where intent is not obvious",
                    "Follow the language's style guide",
                ],
            ),
            ImprovementKind::Performance => (
                "Better algorithms and data structures make code faster and lighter.",
                [
                    "Avoid unnecessary loops",
                    "Choose more efficient data structures",
                    "Reduce memory usage",
                ],
            ),
            ImprovementKind::Readability => (
                "A consistent style and structure make code much easier to read.",
                [
                    "Use consistent indentation and formatting",
                    "Split complex functions",
                    "Use meaningful naming conventions",
                ],
            ),
            ImprovementKind::Security => (
                "Applying security best practices removes common vulnerabilities.",
                [
                    "Validate all user input",
                    "Avoid unsafe functions",
                    "Handle sensitive data carefully",
                ],
            ),
        };

        ImprovementPlan {
            kind,
            explanation: explanation.to_string(),
            points: points.iter().map(|point| point.to_string()).collect(),
        }
    }
}
