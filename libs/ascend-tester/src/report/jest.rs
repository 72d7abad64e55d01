use super::{ParsedOutcome, ReportCounts};
use ascend_common::types::TestCaseResult;
use serde::Deserialize;

/// `jest --json` output
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JestReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub num_total_tests: u64,
    #[serde(default)]
    pub num_passed_tests: u64,
    #[serde(default)]
    pub num_failed_tests: u64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub test_results: Vec<JestTestFile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JestTestFile {
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub assertion_results: Vec<JestAssertionResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JestAssertionResult {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub failure_messages: Vec<String>,
}

impl JestAssertionResult {
    fn into_result(self) -> TestCaseResult {
        let name = self
            .full_name
            .filter(|n| !n.is_empty())
            .or(self.title)
            .unwrap_or_default();

        if self.status.as_deref() == Some("passed") {
            TestCaseResult::passed(name)
        } else if self.failure_messages.is_empty() {
            TestCaseResult::failed(name, "Test failed")
        } else {
            TestCaseResult::failed(name, self.failure_messages.join("\n"))
        }
    }
}

impl JestReport {
    /// The top-level `success` flag is trusted as-is, never recomputed from counts
    pub fn into_outcome(self) -> ParsedOutcome {
        ParsedOutcome {
            verdict: self.success,
            pure_duration_ms: None,
            counts: ReportCounts {
                total: self.num_total_tests,
                passed: self.num_passed_tests,
                failed: self.num_failed_tests,
            },
            cases: self
                .test_results
                .into_iter()
                .flat_map(|file| file.assertion_results)
                .map(JestAssertionResult::into_result)
                .collect(),
        }
    }
}
