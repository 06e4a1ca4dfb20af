//! Security Scanning
//!
//! A fixed catalogue of unsafe-pattern signatures per language. Each check that fires adds
//! one finding; the risk level is a function of the finding count only. Languages without
//! checks (Java, unknown) scan clean.

use crate::analysis::profile::compile_pattern;
use codelens_shared::{Language, Result, SecurityFindings};
use regex::Regex;
use tracing::debug;

pub const HARDCODED_PASSWORD: &str = "Possible hardcoded password";
pub const SQL_INJECTION: &str = "Possible SQL injection: query text is built from interpolated values";
pub const UNSAFE_DESERIALIZATION: &str = "Potentially unsafe deserialization (pickle.loads / yaml.load)";
pub const UNSAFE_EVAL: &str = "Use of the unsafe eval() function";
pub const XSS_RISK: &str = "Possible XSS: HTML is written directly into the document";
pub const REGEX_INJECTION: &str =
    "Regular expression built by concatenation may allow ReDoS attacks";

/// How a check recognises its signature
#[derive(Debug, Clone)]
enum Matcher {
    /// Any of the literal fragments
    Contains(&'static [&'static str]),
    Pattern(Regex),
}

impl Matcher {
    fn is_match(&self, code: &str) -> bool {
        match self {
            Matcher::Contains(needles) => needles.iter().any(|needle| code.contains(needle)),
            Matcher::Pattern(regex) => regex.is_match(code),
        }
    }
}

#[derive(Debug, Clone)]
struct SecurityCheck {
    /// Which languages the check applies to
    applies: fn(Language) -> bool,
    matcher: Matcher,
    finding: &'static str,
}

fn python_only(language: Language) -> bool {
    language == Language::Python
}

/// Signature scanner, compiled once per engine
#[derive(Debug, Clone)]
pub struct SecurityScanner {
    checks: Vec<SecurityCheck>,
}

impl SecurityScanner {
    /// Compile the built-in catalogue
    pub fn new() -> Result<Self> {
        let checks = vec![
            SecurityCheck {
                applies: python_only,
                matcher: Matcher::Pattern(compile_pattern(
                    Language::Python,
                    "security",
                    r#"(?i)password\s*=\s*["'][^"']+["']"#,
                )?),
                finding: HARDCODED_PASSWORD,
            },
            SecurityCheck {
                applies: python_only,
                matcher: Matcher::Pattern(compile_pattern(
                    Language::Python,
                    "security",
                    r#"(?i)execute\(\s*f?["']\s*SELECT[^\n]*?(?:%s|\{[^}\n]*\}|["']\s*\+)"#,
                )?),
                finding: SQL_INJECTION,
            },
            SecurityCheck {
                applies: python_only,
                matcher: Matcher::Contains(&["pickle.loads", "yaml.load("]),
                finding: UNSAFE_DESERIALIZATION,
            },
            SecurityCheck {
                applies: Language::is_ecmascript,
                matcher: Matcher::Contains(&["eval("]),
                finding: UNSAFE_EVAL,
            },
            SecurityCheck {
                applies: Language::is_ecmascript,
                matcher: Matcher::Contains(&["innerHTML", "document.write("]),
                finding: XSS_RISK,
            },
            SecurityCheck {
                applies: Language::is_ecmascript,
                matcher: Matcher::Pattern(compile_pattern(
                    Language::JavaScript,
                    "security",
                    r"RegExp\([^)]+\+",
                )?),
                finding: REGEX_INJECTION,
            },
        ];

        Ok(Self { checks })
    }

    /// Run every check that applies to `language`
    pub fn scan(&self, code: &str, language: Language) -> SecurityFindings {
        let issues: Vec<String> = self
            .checks
            .iter()
            .filter(|check| (check.applies)(language))
            .filter(|check| check.matcher.is_match(code))
            .map(|check| check.finding.to_string())
            .collect();

        debug!("Security scan for {} raised {} issue(s)", language, issues.len());
        SecurityFindings::new(issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codelens_shared::RiskLevel;

    fn scan(code: &str, language: Language) -> SecurityFindings {
        SecurityScanner::new().unwrap().scan(code, language)
    }

    #[test]
    fn test_clean_python() {
        let findings = scan("def f(a,b):\n    return a+b\n", Language::Python);
        assert!(findings.issues.is_empty());
        assert_eq!(findings.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_python_credentials_and_pickle() {
        let code = "PASSWORD = \"abc123\"\ndata = pickle.loads(x)\n";
        let findings = scan(code, Language::Python);
        assert_eq!(findings.issues, vec![HARDCODED_PASSWORD, UNSAFE_DESERIALIZATION]);
        assert_eq!(findings.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_python_sql_injection_variants() {
        let variants = [
            r#"cursor.execute("SELECT * FROM users WHERE id = %s" % uid)"#,
            r#"cursor.execute(f"SELECT * FROM users WHERE id = {uid}")"#,
            r#"cursor.execute("SELECT * FROM users WHERE id = " + uid)"#,
        ];
        for code in variants {
            assert_eq!(scan(code, Language::Python).issues, vec![SQL_INJECTION], "{}", code);
        }

        let constant = r#"cursor.execute("SELECT count(*) FROM users")"#;
        assert!(scan(constant, Language::Python).issues.is_empty());
    }

    #[test]
    fn test_javascript_high_risk() {
        let code = r#"
eval(input);
el.innerHTML = input;
const re = new RegExp("^" + input + "$");
"#;
        let findings = scan(code, Language::JavaScript);
        assert_eq!(findings.issues, vec![UNSAFE_EVAL, XSS_RISK, REGEX_INJECTION]);
        assert_eq!(findings.risk_level, RiskLevel::High);

        assert_eq!(scan(code, Language::TypeScript).issues.len(), 3);
    }

    #[test]
    fn test_checks_are_language_scoped() {
        assert!(scan("eval(x)", Language::Python).issues.is_empty());
        assert!(scan("password = \"hunter2\"", Language::JavaScript).issues.is_empty());
        assert!(scan("password = \"hunter2\"; eval(x)", Language::Java).issues.is_empty());
        assert!(scan("password = \"hunter2\"; eval(x)", Language::Unknown).issues.is_empty());
    }
}
