//! Tool reports written by the in-container runner as `results.json`.
//!
//! Each tester image emits a different JSON shape. [`ReportFormat::decode`]
//! turns the raw text into a [`ToolReport`] variant and
//! [`ToolReport::into_outcome`] folds it into the shared result model, so
//! everything downstream of decoding is language-agnostic.

mod jest;
mod pytest;
mod xunit;

pub use go_test::{GoTestCase, GoTestReport, GoTestSummary};
pub use jest::{JestAssertionResult, JestReport, JestTestFile};
pub use pytest::{PytestCase, PytestReport, PytestSummary};
pub use xunit::{XUnitReport, XUnitTestCase};

use ascend_common::types::TestCaseResult;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// Fixed name of the results artifact inside the execution directory
pub const RESULTS_FILE: &str = "results.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    XUnit,
    GoTest,
    Pytest,
    Jest,
}

#[derive(Debug, Clone)]
pub enum ToolReport {
    XUnit(XUnitReport),
    GoTest(GoTestReport),
    Pytest(PytestReport),
    Jest(JestReport),
}

/// Counts as reported by the tool, for logging only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportCounts {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
}

/// A decoded report folded into the shared model
#[derive(Debug, Clone)]
pub struct ParsedOutcome {
    pub cases: Vec<TestCaseResult>,
    /// The tool's own pass/fail verdict
    pub verdict: bool,
    /// Tool-reported duration, for tools that report one
    pub pure_duration_ms: Option<u64>,
    pub counts: ReportCounts,
}

/// Tester scripts write `null` for arrays they never filled
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn decode_as<T: DeserializeOwned>(content: &str) -> Result<Option<T>, serde_json::Error> {
    serde_json::from_str::<Option<T>>(content)
}

impl ReportFormat {
    /// Tool name used in logs
    pub fn tool_name(&self) -> &'static str {
        match self {
            ReportFormat::XUnit => "xunit",
            ReportFormat::GoTest => "go test",
            ReportFormat::Pytest => "pytest",
            ReportFormat::Jest => "jest",
        }
    }

    /// Decode raw results.json text
    ///
    /// `Ok(None)` means the document was JSON `null`.
    pub fn decode(&self, content: &str) -> Result<Option<ToolReport>, serde_json::Error> {
        let report = match self {
            ReportFormat::XUnit => decode_as(content)?.map(ToolReport::XUnit),
            ReportFormat::GoTest => decode_as(content)?.map(ToolReport::GoTest),
            ReportFormat::Pytest => decode_as(content)?.map(ToolReport::Pytest),
            ReportFormat::Jest => decode_as(content)?.map(ToolReport::Jest),
        };
        Ok(report)
    }
}

impl ToolReport {
    pub fn into_outcome(self) -> ParsedOutcome {
        match self {
            ToolReport::XUnit(report) => report.into_outcome(),
            ToolReport::GoTest(report) => report.into_outcome(),
            ToolReport::Pytest(report) => report.into_outcome(),
            ToolReport::Jest(report) => report.into_outcome(),
        }
    }
}

/// Tool durations are seconds as floats
pub(crate) fn seconds_to_ms(seconds: f64) -> u64 {
    if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_document() {
        for format in [
            ReportFormat::XUnit,
            ReportFormat::GoTest,
            ReportFormat::Pytest,
            ReportFormat::Jest,
        ] {
            assert!(format.decode("null").unwrap().is_none());
        }
    }

    #[test]
    fn test_malformed_documents() {
        assert!(ReportFormat::XUnit.decode("\"not json\"").is_err());
        assert!(ReportFormat::GoTest.decode("{\"tests\": [").is_err());
        assert!(ReportFormat::Jest.decode("not json").is_err());
        // Schema mismatch
        assert!(ReportFormat::Pytest.decode("{\"tests\": 42}").is_err());
    }

    #[test]
    fn test_null_arrays_read_as_empty() {
        let documents = [
            (ReportFormat::XUnit, r#"{"failed":0,"testCases":null}"#),
            (ReportFormat::GoTest, r#"{"tests":null,"summary":{"failed":0}}"#),
            (ReportFormat::Pytest, r#"{"tests":null,"summary":{"failed":0}}"#),
            (ReportFormat::Jest, r#"{"success":true,"testResults":null}"#),
        ];

        for (format, document) in documents {
            let outcome = format.decode(document).unwrap().unwrap().into_outcome();
            assert!(outcome.cases.is_empty(), "{}", format.tool_name());
            assert!(outcome.verdict, "{}", format.tool_name());
        }
    }

    #[test]
    fn test_jest_nested_nulls() {
        let outcome = ReportFormat::Jest
            .decode(r#"{"success":false,"testResults":[{"assertionResults":null},{"assertionResults":[{"status":"failed","title":"t","failureMessages":null}]}]}"#)
            .unwrap()
            .unwrap()
            .into_outcome();

        assert_eq!(outcome.cases, vec![TestCaseResult::failed("t", "Test failed")]);
    }

    #[test]
    fn test_seconds_to_ms() {
        assert_eq!(seconds_to_ms(0.012), 12);
        assert_eq!(seconds_to_ms(1.5), 1500);
        assert_eq!(seconds_to_ms(0.0), 0);
        assert_eq!(seconds_to_ms(-3.0), 0);
        assert_eq!(seconds_to_ms(f64::NAN), 0);
    }
}
