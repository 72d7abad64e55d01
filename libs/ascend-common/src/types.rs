use serde::{Deserialize, Serialize};
use std::fmt;

/// Timeout every tester image assumes when no override file is present
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Memory ceiling used when a lesson does not declare one
pub const DEFAULT_MEMORY_LIMIT_MB: u64 = 256;

/// Strongly-typed language enum
/// One variant per tester image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    CSharp,
    Go,
    Python,
    TypeScript,
}

impl Language {
    /// Returns all language variants
    /// This is the single source of truth for available languages
    pub fn all_variants() -> &'static [Language] {
        &[
            Language::CSharp,
            Language::Go,
            Language::Python,
            Language::TypeScript,
        ]
    }

    /// Canonical identifier used by lessons and the web layer
    pub fn identifier(&self) -> &'static str {
        match self {
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Python => "python",
            Language::TypeScript => "typescript",
        }
    }

    /// Parse a language from string (case-insensitive, no aliases)
    pub fn from_str(s: &str) -> Option<Language> {
        Language::all_variants()
            .iter()
            .copied()
            .find(|lang| lang.identifier().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Declared test case (lesson-authored, read-only)
///
/// Input and expected output are kept as raw JSON because authors store
/// numbers, strings and arrays alike.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub input: serde_json::Value,
    #[serde(default, alias = "expected")]
    pub expected_output: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_code: Option<String>,
}

impl TestCase {
    /// Display name for this case: name, then description, then nothing
    pub fn display_name(&self) -> Option<&str> {
        if !self.name.is_empty() {
            Some(&self.name)
        } else if !self.description.is_empty() {
            Some(&self.description)
        } else {
            None
        }
    }
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_memory_limit_mb() -> u64 {
    DEFAULT_MEMORY_LIMIT_MB
}

/// Test configuration attached to a lesson
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    #[serde(default)]
    pub test_template: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_function: Option<String>,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_memory_limit_mb")]
    pub memory_limit_mb: u64,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            test_template: String::new(),
            main_function: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            test_cases: Vec::new(),
        }
    }
}

/// Lesson descriptor as handed over by the course content system
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub language: String,
    #[serde(default)]
    pub test_config: TestConfig,
}

/// Per-case outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub passed: bool,
    pub test_name: String,
    pub message: String,
}

impl TestCaseResult {
    pub fn passed(test_name: impl Into<String>) -> Self {
        Self {
            passed: true,
            test_name: test_name.into(),
            message: "Test passed".to_string(),
        }
    }

    pub fn failed(test_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            passed: false,
            test_name: test_name.into(),
            message: message.into(),
        }
    }
}

/// Timing breakdown for tools that report their own duration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Wall-clock time of the whole container run
    pub total_execution_time_ms: u64,
    /// Duration reported by the test tool itself
    pub pure_test_execution_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_startup_time_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_cleanup_time_ms: Option<u64>,
    pub infrastructure_overhead_ms: u64,
}

impl PerformanceMetrics {
    pub fn new(total_execution_time_ms: u64, pure_test_execution_time_ms: u64) -> Self {
        Self {
            total_execution_time_ms,
            pure_test_execution_time_ms,
            container_startup_time_ms: None,
            container_cleanup_time_ms: None,
            infrastructure_overhead_ms: total_execution_time_ms
                .saturating_sub(pure_test_execution_time_ms),
        }
    }
}

/// Normalized result of one execution attempt
///
/// ## Invariants (once returned by a strategy):
/// - `test_results` is never empty
/// - every `test_name` is non-empty
/// - `success` is false whenever parsing failed
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub success: bool,
    pub test_results: Vec<TestCaseResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compilation_output: Option<String>,
}

impl TestResult {
    pub fn passed_count(&self) -> usize {
        self.test_results.iter().filter(|r| r.passed).count()
    }
}
