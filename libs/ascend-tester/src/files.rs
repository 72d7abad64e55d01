/// File materialization for the execution directory
///
/// Building the file set is pure; writing it is a separate, unconditional
/// step. Runner-config overrides only appear in the set when the lesson's
/// timeout differs from the one baked into the tester image.
use anyhow::{Context, Result};
use ascend_common::types::{Language, TestConfig};
use std::path::Path;
use tracing::debug;

/// Placeholder replaced by the submission in embedded test templates
pub const USER_CODE_PLACEHOLDER: &str = "__USER_CODE__";

pub const GO_MOD_CONTENT: &str = "module solution\n\ngo 1.21\n";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    pub name: &'static str,
    pub contents: String,
}

impl TestFile {
    pub fn new(name: &'static str, contents: impl Into<String>) -> Self {
        Self {
            name,
            contents: contents.into(),
        }
    }
}

/// Substitute the submission into a template at every placeholder
pub fn embed_user_code(template: &str, user_code: &str) -> String {
    template.replace(USER_CODE_PLACEHOLDER, user_code)
}

fn timeout_seconds(timeout_ms: u64) -> u64 {
    timeout_ms.div_ceil(1000)
}

/// Runner-config overrides for a lesson; empty when the image default applies
pub fn override_files(
    language: Language,
    test_config: &TestConfig,
    image_default_timeout_ms: u64,
) -> Vec<TestFile> {
    let timeout_ms = test_config.timeout_ms;
    if timeout_ms == image_default_timeout_ms {
        return Vec::new();
    }

    let file = match language {
        Language::CSharp => TestFile::new(
            "test-config.json",
            format!("{{\n  \"timeout\": {}\n}}", timeout_ms),
        ),
        Language::Go => TestFile::new(
            "test-config.json",
            format!("{{\n  \"timeout\": {}\n}}", timeout_seconds(timeout_ms)),
        ),
        Language::Python => TestFile::new(
            "pytest.ini",
            format!("[pytest]\ntimeout = {}\n", timeout_seconds(timeout_ms)),
        ),
        Language::TypeScript => TestFile::new(
            "jest.config.js",
            format!(
                "const timeoutSeconds = {};\n\nmodule.exports = {{\n  preset: 'ts-jest',\n  testEnvironment: 'node',\n  testTimeout: timeoutSeconds * 1000,\n}};\n",
                timeout_seconds(timeout_ms)
            ),
        ),
    };

    vec![file]
}

/// Write every file into the execution directory, in order
///
/// The first failure aborts and propagates: a container must never run
/// against a partially prepared directory.
pub async fn write_test_files(execution_dir: &Path, files: &[TestFile]) -> Result<()> {
    for file in files {
        let path = execution_dir.join(file.name);
        tokio::fs::write(&path, &file.contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!(
            file = file.name,
            bytes = file.contents.len(),
            "Wrote test file"
        );
    }

    Ok(())
}
