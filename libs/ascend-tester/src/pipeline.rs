/// Result Pipeline - Raw Execution Artifacts to TestResult
///
/// **Flow:**
/// 1. Look for `results.json` in the execution directory
/// 2. Found: decode it with the language's report format
///    - decoded → per-case results + tool verdict
///    - unparseable → single "Parser Error" case
///    - read failure → single "Exception" case
/// 3. Not found: classify stderr/stdout into a single "Execution Error" case
/// 4. Reconcile against the lesson's declared test cases
///
/// The pipeline never fails: every path ends in a populated TestResult.
use crate::diagnostics::RawResultsArchive;
use crate::fallback::{classify_failure, FailureRules};
use crate::reconcile::{reconcile, ReconcilePolicy};
use crate::report::{ParsedOutcome, ReportFormat, RESULTS_FILE};
use anyhow::{Context, Result};
use ascend_common::types::{Language, PerformanceMetrics, TestCaseResult, TestConfig, TestResult};
use std::path::Path;
use tracing::{debug, error, info, warn};

pub const PARSER_ERROR_NAME: &str = "Parser Error";
pub const PARSER_ERROR_MESSAGE: &str = "Failed to parse test results from results.json";
pub const EXCEPTION_NAME: &str = "Exception";
pub const EXECUTION_ERROR_NAME: &str = "Execution Error";

/// What the orchestrator captured from the container run
#[derive(Debug, Clone, Copy)]
pub struct ExecutionArtifacts<'a> {
    pub stdout: &'a str,
    pub stderr: &'a str,
    pub exit_code: i64,
    /// Wall-clock time of the whole container run
    pub execution_time_ms: u64,
    pub execution_dir: &'a Path,
}

/// Everything language-specific the pipeline needs
#[derive(Debug, Clone)]
pub struct ResultProfile {
    pub language: Language,
    pub format: ReportFormat,
    pub rules: FailureRules,
    pub policy: ReconcilePolicy,
    /// Whether the tool's own duration is surfaced as performance metrics
    pub reports_timing: bool,
}

enum StructuredParse {
    Parsed(ParsedOutcome),
    Unparseable(String),
}

/// Signal-style exit codes worth surfacing next to the error message
fn describe_exit_code(exit_code: i64) -> Option<&'static str> {
    match exit_code {
        137 => Some("container killed, likely exceeded memory limit or timeout"),
        139 => Some("segmentation fault"),
        _ => None,
    }
}

async fn parse_results_file(
    profile: &ResultProfile,
    archive: &RawResultsArchive,
    results_path: &Path,
) -> Result<StructuredParse> {
    let content = tokio::fs::read_to_string(results_path)
        .await
        .with_context(|| format!("Failed to read {}", results_path.display()))?;

    // Side channel: its outcome never reaches the result
    archive.archive(profile.language, &content).await;

    let parsed = match profile.format.decode(&content) {
        Ok(Some(report)) => StructuredParse::Parsed(report.into_outcome()),
        Ok(None) => StructuredParse::Unparseable("document is null".to_string()),
        Err(e) => StructuredParse::Unparseable(e.to_string()),
    };
    Ok(parsed)
}

fn apply_outcome(
    result: &mut TestResult,
    profile: &ResultProfile,
    outcome: ParsedOutcome,
    artifacts: &ExecutionArtifacts<'_>,
) {
    info!(
        language = %profile.language,
        tool = profile.format.tool_name(),
        total = outcome.counts.total,
        passed = outcome.counts.passed,
        failed = outcome.counts.failed,
        "Parsed test results"
    );

    if profile.reports_timing {
        let pure_ms = outcome.pure_duration_ms.unwrap_or(0);
        debug!(pure_test_execution_time_ms = pure_ms, "Pure test execution time");
        result.performance = Some(PerformanceMetrics::new(artifacts.execution_time_ms, pure_ms));
    }

    result.test_results = outcome.cases;
    result.success = outcome.verdict && artifacts.exit_code == 0;

    if outcome.verdict && artifacts.exit_code != 0 {
        warn!(
            exit_code = artifacts.exit_code,
            "Tool reported success but the runner exited non-zero"
        );
        result.error_message = Some(format!(
            "Test runner exited with code {}",
            artifacts.exit_code
        ));
    }
}

fn apply_fallback(result: &mut TestResult, profile: &ResultProfile, artifacts: &ExecutionArtifacts<'_>) {
    let classification = classify_failure(artifacts.stdout, artifacts.stderr, &profile.rules);
    if classification.matched {
        warn!(error = %classification.message, "Compilation or syntax error detected");
    }

    result.error_message = Some(match describe_exit_code(artifacts.exit_code) {
        Some(reason) => format!("{} (exit code {}: {})", classification.message, artifacts.exit_code, reason),
        None => classification.message.clone(),
    });
    if classification.matched {
        result.compilation_output = Some(artifacts.stderr.to_string());
    }

    result
        .test_results
        .push(TestCaseResult::failed(EXECUTION_ERROR_NAME, classification.message));
    result.success = false;
}

/// Interpret one container run
pub async fn process_execution_result(
    profile: &ResultProfile,
    archive: &RawResultsArchive,
    artifacts: ExecutionArtifacts<'_>,
    test_config: &TestConfig,
) -> TestResult {
    let mut result = TestResult {
        success: artifacts.exit_code == 0,
        performance: profile
            .reports_timing
            .then(|| PerformanceMetrics::new(artifacts.execution_time_ms, 0)),
        ..Default::default()
    };

    let results_path = artifacts.execution_dir.join(RESULTS_FILE);
    debug!(path = %results_path.display(), "Looking for results file");

    let has_results = tokio::fs::try_exists(&results_path).await.unwrap_or(false);

    if has_results {
        info!(path = %results_path.display(), "Found results file");

        match parse_results_file(profile, archive, &results_path).await {
            Ok(StructuredParse::Parsed(outcome)) => {
                apply_outcome(&mut result, profile, outcome, &artifacts);
            }
            Ok(StructuredParse::Unparseable(reason)) => {
                warn!(
                    tool = profile.format.tool_name(),
                    reason = %reason,
                    "Failed to parse results file"
                );
                result
                    .test_results
                    .push(TestCaseResult::failed(PARSER_ERROR_NAME, PARSER_ERROR_MESSAGE));
                result.error_message = Some(PARSER_ERROR_MESSAGE.to_string());
                result.success = false;
            }
            Err(e) => {
                error!(error = %format!("{:#}", e), "Error parsing test results");
                let message = format!("Error parsing test results: {:#}", e);
                result.test_results = vec![TestCaseResult::failed(EXCEPTION_NAME, message.clone())];
                result.error_message = Some(message);
                result.success = false;
            }
        }
    } else {
        warn!(path = %results_path.display(), "Results file not found");
        apply_fallback(&mut result, profile, &artifacts);
    }

    reconcile(&mut result, &test_config.test_cases, profile.policy);

    info!(
        language = %profile.language,
        success = result.success,
        test_cases = result.test_results.len(),
        passed = result.passed_count(),
        "Test processing complete"
    );

    result
}
