use super::{ParsedOutcome, ReportCounts};
use ascend_common::types::TestCaseResult;
use serde::Deserialize;

/// Summary emitted by the C# tester image (xUnit results converted to JSON)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XUnitReport {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub time: f64,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub test_cases: Vec<XUnitTestCase>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct XUnitTestCase {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub error_stack_trace: Option<String>,
}

impl XUnitTestCase {
    fn into_result(self) -> TestCaseResult {
        let name = self.name.unwrap_or_default();
        if self.result.as_deref() == Some("Pass") {
            TestCaseResult::passed(name)
        } else {
            let message = self
                .error_message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| "Test failed".to_string());
            TestCaseResult::failed(name, message)
        }
    }
}

impl XUnitReport {
    pub fn into_outcome(self) -> ParsedOutcome {
        let counts = ReportCounts {
            total: self.total,
            passed: self.passed,
            failed: self.failed,
        };

        ParsedOutcome {
            verdict: self.failed == 0,
            // Reported but not surfaced: the C# image's clock includes the build
            pure_duration_ms: None,
            counts,
            cases: self
                .test_cases
                .into_iter()
                .map(XUnitTestCase::into_result)
                .collect(),
        }
    }
}
