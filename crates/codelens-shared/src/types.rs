//! Core types used throughout Codelens.rs

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Programming languages supported by Codelens.rs
///
/// Deserialization goes through [`Language::from_tag`], so aliases and unrecognised tags
/// are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    Java,
    Unknown,
}

impl Language {
    /// Every language with a dedicated profile
    pub const KNOWN: [Language; 4] = [
        Language::Python,
        Language::JavaScript,
        Language::TypeScript,
        Language::Java,
    ];

    /// Get file extensions for this language
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Python => &["py", "pyw", "pyi"],
            Language::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Language::TypeScript => &["ts", "tsx"],
            Language::Java => &["java"],
            Language::Unknown => &[],
        }
    }

    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.trim_start_matches('.').to_lowercase();
        Language::KNOWN
            .into_iter()
            .find(|language| language.extensions().contains(&ext.as_str()))
            .unwrap_or(Language::Unknown)
    }

    /// Parse a language tag; unrecognised tags become `Unknown`
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "python" | "py" => Language::Python,
            "javascript" | "js" | "node" => Language::JavaScript,
            "typescript" | "ts" => Language::TypeScript,
            "java" => Language::Java,
            _ => Language::Unknown,
        }
    }

    /// Canonical lowercase tag
    pub fn tag(self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Java => "java",
            Language::Unknown => "unknown",
        }
    }

    /// JavaScript and TypeScript share idiom and security rules
    pub fn is_ecmascript(self) -> bool {
        matches!(self, Language::JavaScript | Language::TypeScript)
    }
}

impl FromStr for Language {
    type Err = Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Language::from_tag(s))
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::from_tag(&tag)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A snippet of source code submitted for analysis
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CodeSample {
    pub text: String,
    pub language: Language,
    pub context: Option<String>,
}

impl CodeSample {
    pub fn new(text: impl Into<String>, language: Language) -> Self {
        Self {
            text: text.into(),
            language,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Structural counts and excerpts
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StructureMetrics {
    pub total_lines: usize,
    pub comment_lines: usize,
    pub comment_ratio: f64,
    pub function_count: usize,
    pub class_count: usize,
    pub import_count: usize,
    #[serde(rename = "functions")]
    pub function_names: Vec<String>,
    #[serde(rename = "classes")]
    pub class_names: Vec<String>,
}

/// Complexity bucket derived from cyclomatic complexity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
}

impl ComplexityLevel {
    /// Convert from cyclomatic complexity
    pub fn from_cyclomatic(cyclomatic: usize) -> Self {
        match cyclomatic {
            c if c <= 5 => ComplexityLevel::Low,
            c if c <= 10 => ComplexityLevel::Medium,
            _ => ComplexityLevel::High,
        }
    }
}

/// Complexity estimates
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ComplexityMetrics {
    pub cyclomatic_complexity: usize,
    pub complexity_level: ComplexityLevel,
    pub max_nesting_depth: usize,
    pub condition_count: usize,
    pub loop_count: usize,
    pub try_count: usize,
    pub function_count: usize,
}

impl ComplexityMetrics {
    /// Build metrics from raw counts; cyclomatic complexity and level are derived
    pub fn from_counts(
        condition_count: usize,
        loop_count: usize,
        try_count: usize,
        function_count: usize,
        max_nesting_depth: usize,
    ) -> Self {
        let cyclomatic_complexity = 1 + condition_count + loop_count + try_count;

        Self {
            cyclomatic_complexity,
            complexity_level: ComplexityLevel::from_cyclomatic(cyclomatic_complexity),
            max_nesting_depth,
            condition_count,
            loop_count,
            try_count,
            function_count,
        }
    }
}

/// Qualitative rating used for maintainability, readability and efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rating {
    Excellent,
    Good,
    Medium,
    NeedsImprovement,
    Unknown,
}

/// Raw signals the quality ratings are derived from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QualitySignals {
    pub comment_ratio: f64,
    pub has_exception_handling: bool,
    pub long_line_ratio: f64,
}

/// Quality ratings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct QualityMetrics {
    pub maintainability: Rating,
    pub readability: Rating,
    pub efficiency: Rating,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<QualitySignals>,
}

impl QualityMetrics {
    /// Placeholder ratings used when analysis could not complete
    pub fn unknown() -> Self {
        Self {
            maintainability: Rating::Unknown,
            readability: Rating::Unknown,
            efficiency: Rating::Unknown,
            metrics: None,
        }
    }
}

/// Security risk bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Risk is a pure function of how many findings were raised
    pub fn from_issue_count(count: usize) -> Self {
        match count {
            0 => RiskLevel::Low,
            1 | 2 => RiskLevel::Medium,
            _ => RiskLevel::High,
        }
    }
}

/// Findings of the security scan
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecurityFindings {
    pub issues: Vec<String>,
    pub risk_level: RiskLevel,
}

impl SecurityFindings {
    pub fn new(issues: Vec<String>) -> Self {
        let risk_level = RiskLevel::from_issue_count(issues.len());
        Self { issues, risk_level }
    }
}

/// Aggregate result of one analysis call
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnalysisReport {
    pub code_quality: QualityMetrics,
    pub complexity: Option<ComplexityMetrics>,
    pub structure: Option<StructureMetrics>,
    pub security: Option<SecurityFindings>,
    pub suggestions: Vec<String>,
    pub potential_issues: Vec<String>,
    pub best_practices: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Generic suggestion carried by a degraded report
pub const DEGRADED_SUGGESTION: &str =
    "Analysis failed part-way through; check the code formatting and try again";

/// Generic issue carried by a degraded report
pub const DEGRADED_ISSUE: &str = "Analysis incomplete";

impl AnalysisReport {
    /// Report produced after a sub-analysis failure
    pub fn degraded(error: impl Into<String>, best_practices: Vec<String>) -> Self {
        Self {
            code_quality: QualityMetrics::unknown(),
            complexity: None,
            structure: None,
            security: None,
            suggestions: vec![DEGRADED_SUGGESTION.to_string()],
            potential_issues: vec![DEGRADED_ISSUE.to_string()],
            best_practices,
            error: Some(error.into()),
        }
    }

    /// Whether this report was produced on the failure path
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
