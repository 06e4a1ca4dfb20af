//! Language Profiles
//!
//! Every analyzer reads the same per-language pattern set. Patterns are compiled once,
//! when the registry is built, and the registry is read-only afterwards so it can be
//! shared across analysis tasks without locking.

use codelens_shared::{CodelensError, Language, Result};
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::debug;

/// Language used when no dedicated profile exists
pub const DEFAULT_LANGUAGE: Language = Language::Python;

/// Upper bound on the compiled size of a single pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Matches of this capture group are recognised but not counted
const SKIP_GROUP: &str = "skip";

/// How a language delimits blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockStyle {
    Indentation,
    Braces,
}

/// Raw pattern sources for one language
#[derive(Debug, Clone, Copy)]
pub struct ProfilePatterns<'a> {
    pub block_style: BlockStyle,
    pub comment: &'a str,
    pub function: &'a str,
    pub class: &'a str,
    pub import: &'a str,
    pub exception: &'a str,
    pub conditions: &'a str,
    pub loops: &'a str,
    pub try_blocks: &'a str,
}

const PYTHON: ProfilePatterns<'static> = ProfilePatterns {
    block_style: BlockStyle::Indentation,
    comment: r#"#.*$|"""[\s\S]*?"""|'''[\s\S]*?'''"#,
    function: r"^[ \t]*(?:async[ \t]+)?def[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*\(",
    class: r"^[ \t]*class[ \t]+([A-Za-z_][A-Za-z0-9_]*)[ \t]*[(:]",
    import: r"^[ \t]*import[ \t]+([A-Za-z_][A-Za-z0-9_.]*)|^[ \t]*from[ \t]+([A-Za-z_.][A-Za-z0-9_.]*)[ \t]+import\b",
    exception: r"^[ \t]*(?:try[ \t]*:|except\b|finally[ \t]*:)",
    conditions: r"^[ \t]*(?:if|elif)\b|^[ \t]*else[ \t]*:",
    loops: r"^[ \t]*(?:async[ \t]+)?(?:for|while)\b",
    try_blocks: r"^[ \t]*try[ \t]*:",
};

const ECMASCRIPT: ProfilePatterns<'static> = ProfilePatterns {
    block_style: BlockStyle::Braces,
    comment: r"//.*$|/\*[\s\S]*?\*/",
    function: r"\bfunction\b\s*\*?\s*([A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\(|\b(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*=\s*(?:async\s+)?(?:\([^)]*\)(?:\s*:\s*[^=;{]+?)?|[A-Za-z_$][\w$]*)\s*=>|\b([A-Za-z_$][\w$]*)\s*:\s*(?:async\s+)?function\b",
    class: r"\bclass\s+([A-Za-z_$][\w$]*)\s*(?:<[^>{]*>\s*)?(?:\{|\bextends\b|\bimplements\b)",
    import: r#"\bimport\s+(?:type\s+)?[^;'"]*?\bfrom\s*["']([^"']+)["']|\bimport\s*["']([^"']+)["']|\brequire\s*\(\s*["']([^"']+)["']\s*\)"#,
    exception: r"\btry\s*\{|\bcatch\s*[({]|\bfinally\s*\{",
    conditions: r"(?P<skip>\?\?=?|\?\.|\?:)|\bif\s*\(|\belse\b|\?",
    loops: r"\bfor\s*\(|\bfor\s+await\s*\(|\bwhile\s*\(|\bdo\s*\{",
    try_blocks: r"\btry\s*\{",
};

const JAVA: ProfilePatterns<'static> = ProfilePatterns {
    block_style: BlockStyle::Braces,
    comment: r"//.*$|/\*[\s\S]*?\*/",
    function: r"^[ \t]*(?:(?:public|private|protected|static|final|abstract|synchronized|native|default)\s+)+(?:[\w<>\[\],.? ]+?\s+)?([A-Za-z_$][\w$]*)\s*\(",
    class: r"\b(?:class|interface|enum|record)\s+([A-Za-z_$][\w$]*)",
    import: r"^[ \t]*import\s+(?:static\s+)?([\w.]+(?:\.\*)?)\s*;",
    exception: r"\btry\s*[({]|\bcatch\s*\(|\bfinally\s*\{",
    conditions: r"(?P<skip><\?)|\bif\s*\(|\belse\b|\?",
    loops: r"\bfor\s*\(|\bwhile\s*\(|\bdo\s*\{",
    try_blocks: r"\btry\s*[({]",
};

/// Built-in pattern table. Exhaustive so a new language cannot be added without a profile
/// decision.
fn builtin_patterns(language: Language) -> Option<ProfilePatterns<'static>> {
    match language {
        Language::Python => Some(PYTHON),
        Language::JavaScript | Language::TypeScript => Some(ECMASCRIPT),
        Language::Java => Some(JAVA),
        Language::Unknown => None,
    }
}

/// Compiled pattern set for one language
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    language: Language,
    block_style: BlockStyle,
    pub(crate) comment: Regex,
    pub(crate) function: Regex,
    pub(crate) class: Regex,
    pub(crate) import: Regex,
    pub(crate) exception: Regex,
    pub(crate) conditions: Regex,
    pub(crate) loops: Regex,
    pub(crate) try_blocks: Regex,
}

impl LanguageProfile {
    /// Compile and validate a profile
    pub fn compile(language: Language, patterns: &ProfilePatterns<'_>) -> Result<Self> {
        Ok(Self {
            language,
            block_style: patterns.block_style,
            comment: compile_pattern(language, "comment", patterns.comment)?,
            function: compile_pattern(language, "function", patterns.function)?,
            class: compile_pattern(language, "class", patterns.class)?,
            import: compile_pattern(language, "import", patterns.import)?,
            exception: compile_pattern(language, "exception", patterns.exception)?,
            conditions: compile_pattern(language, "conditions", patterns.conditions)?,
            loops: compile_pattern(language, "loops", patterns.loops)?,
            try_blocks: compile_pattern(language, "try", patterns.try_blocks)?,
        })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn block_style(&self) -> BlockStyle {
        self.block_style
    }
}

/// Coarse keyword counters for languages without a profile
#[derive(Debug, Clone)]
pub struct CoarsePatterns {
    pub(crate) conditions: Regex,
    pub(crate) loops: Regex,
}

impl CoarsePatterns {
    fn new() -> Result<Self> {
        Ok(Self {
            conditions: compile_pattern(Language::Unknown, "conditions", r"(?i)if|else")?,
            loops: compile_pattern(Language::Unknown, "loops", r"(?i)for|while|do")?,
        })
    }
}

/// Registry of compiled language profiles
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    default: LanguageProfile,
    profiles: HashMap<Language, LanguageProfile>,
    coarse: CoarsePatterns,
}

impl ProfileRegistry {
    /// Build the registry from the built-in pattern table
    pub fn new() -> Result<Self> {
        let default = LanguageProfile::compile(DEFAULT_LANGUAGE, &PYTHON)?;

        let mut profiles = HashMap::new();
        for language in Language::KNOWN {
            if language == DEFAULT_LANGUAGE {
                continue;
            }
            if let Some(patterns) = builtin_patterns(language) {
                profiles.insert(language, LanguageProfile::compile(language, &patterns)?);
            }
        }

        debug!("Compiled {} language profiles", profiles.len() + 1);

        Ok(Self {
            default,
            profiles,
            coarse: CoarsePatterns::new()?,
        })
    }

    /// Profile for a language, falling back to the default profile
    pub fn profile_for(&self, language: Language) -> &LanguageProfile {
        self.lookup(language).unwrap_or(&self.default)
    }

    /// Profile for a language, if it has a dedicated one
    pub fn lookup(&self, language: Language) -> Option<&LanguageProfile> {
        if language == DEFAULT_LANGUAGE {
            Some(&self.default)
        } else {
            self.profiles.get(&language)
        }
    }

    /// Replace or add a profile after validating its patterns
    pub fn register(&mut self, language: Language, patterns: &ProfilePatterns<'_>) -> Result<()> {
        if language == Language::Unknown {
            return Err(CodelensError::InvalidInput {
                message: "cannot register a profile for an unknown language".to_string(),
            });
        }

        let profile = LanguageProfile::compile(language, patterns)?;
        if language == DEFAULT_LANGUAGE {
            self.default = profile;
        } else {
            self.profiles.insert(language, profile);
        }
        Ok(())
    }

    /// Languages with a dedicated profile
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = std::iter::once(DEFAULT_LANGUAGE)
            .chain(self.profiles.keys().copied())
            .collect();
        languages.sort_by_key(|language| language.tag());
        languages
    }

    pub fn coarse(&self) -> &CoarsePatterns {
        &self.coarse
    }
}

/// Compile a pattern with multi-line anchors and a bounded program size
pub(crate) fn compile_pattern(language: Language, kind: &'static str, pattern: &str) -> Result<Regex> {
    if pattern.trim().is_empty() {
        return Err(CodelensError::Pattern {
            language,
            kind,
            message: "pattern is empty".to_string(),
        });
    }

    RegexBuilder::new(pattern)
        .multi_line(true)
        .size_limit(PATTERN_SIZE_LIMIT)
        .dfa_size_limit(PATTERN_SIZE_LIMIT)
        .build()
        .map_err(|e| CodelensError::Pattern {
            language,
            kind,
            message: e.to_string(),
        })
}

/// Count matches, ignoring those that only hit the `skip` group
pub(crate) fn count_matches(pattern: &Regex, text: &str) -> usize {
    let has_skip = pattern
        .capture_names()
        .any(|name| name == Some(SKIP_GROUP));

    if has_skip {
        pattern
            .captures_iter(text)
            .filter(|caps| caps.name(SKIP_GROUP).is_none())
            .count()
    } else {
        pattern.find_iter(text).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_compile() {
        let registry = ProfileRegistry::new().unwrap();
        assert_eq!(
            registry.languages(),
            vec![
                Language::Java,
                Language::JavaScript,
                Language::Python,
                Language::TypeScript
            ]
        );
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        let registry = ProfileRegistry::new().unwrap();
        assert!(registry.lookup(Language::Unknown).is_none());
        assert_eq!(
            registry.profile_for(Language::Unknown).language(),
            Language::Python
        );
        assert_eq!(
            registry.profile_for(Language::Java).block_style(),
            BlockStyle::Braces
        );
    }

    #[test]
    fn test_register_rejects_invalid_pattern() {
        let mut registry = ProfileRegistry::new().unwrap();
        let broken = ProfilePatterns {
            comment: r"(unclosed",
            ..JAVA
        };

        let err = registry.register(Language::Java, &broken).unwrap_err();
        assert!(matches!(
            err,
            CodelensError::Pattern {
                kind: "comment",
                ..
            }
        ));
    }

    #[test]
    fn test_register_rejects_oversized_pattern() {
        let mut registry = ProfileRegistry::new().unwrap();
        let huge = r"\w{1000}\w{1000}\w{1000}\w{1000}";
        let patterns = ProfilePatterns {
            function: huge,
            ..JAVA
        };

        assert!(registry.register(Language::Java, &patterns).is_err());
    }

    #[test]
    fn test_register_rejects_empty_and_unknown() {
        let mut registry = ProfileRegistry::new().unwrap();
        let empty = ProfilePatterns {
            import: "  ",
            ..PYTHON
        };
        assert!(registry.register(Language::Python, &empty).is_err());
        assert!(registry.register(Language::Unknown, &PYTHON).is_err());
    }

    #[test]
    fn test_count_matches_honours_skip_group() {
        let registry = ProfileRegistry::new().unwrap();
        let profile = registry.profile_for(Language::JavaScript);

        let code = "const a = b ? c : d;\nconst e = f?.g ?? h;\n";
        assert_eq!(count_matches(&profile.conditions, code), 1);
    }
}
