use super::{seconds_to_ms, ParsedOutcome, ReportCounts};
use ascend_common::types::TestCaseResult;
use serde::Deserialize;
use tracing::warn;

/// pytest JSON report as written by the Python tester image
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PytestReport {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub tests: Vec<PytestCase>,
    #[serde(default)]
    pub summary: Option<PytestSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PytestSummary {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub passed: u64,
    #[serde(default)]
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
    /// Collection and fixture errors, counted apart from failures
    #[serde(default)]
    pub error: u64,
    /// Seconds
    #[serde(default)]
    pub duration: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PytestCase {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub traceback: Option<String>,
}

impl PytestCase {
    fn into_result(self) -> TestCaseResult {
        let name = self.name.unwrap_or_default();
        if self.outcome.as_deref() == Some("passed") {
            TestCaseResult::passed(name)
        } else {
            let message = self.message.unwrap_or_else(|| "Test failed".to_string());
            TestCaseResult::failed(name, message)
        }
    }
}

impl PytestReport {
    pub fn into_outcome(self) -> ParsedOutcome {
        // A missing summary counts as zero failures and zero errors
        let summary = self.summary.unwrap_or_else(|| {
            warn!("pytest report has no summary, using zero counts");
            PytestSummary::default()
        });

        ParsedOutcome {
            verdict: summary.failed == 0 && summary.error == 0,
            pure_duration_ms: Some(seconds_to_ms(summary.duration)),
            counts: ReportCounts {
                total: summary.total,
                passed: summary.passed,
                failed: summary.failed + summary.error,
            },
            cases: self.tests.into_iter().map(PytestCase::into_result).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportFormat, ToolReport};

    fn decode(json: &str) -> PytestReport {
        match ReportFormat::Pytest.decode(json).unwrap() {
            Some(ToolReport::Pytest(report)) => report,
            other => panic!("unexpected report: {:?}", other),
        }
    }

    #[test]
    fn test_all_passed() {
        let outcome = decode(
            r#"{"tests":[{"name":"test_add","outcome":"passed","duration":0.001}],
                "summary":{"total":1,"passed":1,"failed":0,"skipped":0,"error":0,"duration":0.25}}"#,
        )
        .into_outcome();

        assert!(outcome.verdict);
        assert_eq!(outcome.pure_duration_ms, Some(250));
        assert_eq!(outcome.cases, vec![TestCaseResult::passed("test_add")]);
    }

    #[test]
    fn test_error_count_fails_run() {
        let outcome = decode(
            r#"{"tests":[{"name":"test_add","outcome":"passed"}],
                "summary":{"total":1,"passed":1,"failed":0,"error":1,"duration":0.1}}"#,
        )
        .into_outcome();

        assert!(!outcome.verdict);
        assert_eq!(outcome.counts.failed, 1);
    }

    #[test]
    fn test_failed_case_message() {
        let outcome = decode(
            r#"{"tests":[
                {"name":"test_add","outcome":"failed","message":"assert 3 == 4","traceback":"..."},
                {"name":"test_sub","outcome":"error"}
            ],"summary":{"failed":1,"error":1}}"#,
        )
        .into_outcome();

        assert_eq!(outcome.cases[0], TestCaseResult::failed("test_add", "assert 3 == 4"));
        assert_eq!(outcome.cases[1].message, "Test failed");
    }

    #[test]
    fn test_missing_summary_uses_zero_counts() {
        let outcome = decode(r#"{"tests":[{"name":"test_add","outcome":"passed"}]}"#).into_outcome();

        assert!(outcome.verdict);
        assert_eq!(outcome.pure_duration_ms, Some(0));
        assert_eq!(outcome.cases, vec![TestCaseResult::passed("test_add")]);
    }
}
