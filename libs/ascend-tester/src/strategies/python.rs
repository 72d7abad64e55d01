use crate::config::LanguageConfigManager;
use crate::diagnostics::RawResultsArchive;
use crate::fallback::FailureRules;
use crate::files::{override_files, TestFile};
use crate::pipeline::ResultProfile;
use crate::reconcile::ReconcilePolicy;
use crate::report::ReportFormat;
use crate::strategy::{LanguageStrategy, StrategySettings};
use ascend_common::types::{Language, Lesson};

pub const PYTHON_TESTER_IMAGE: &str = "jhypki/ascenddev-python-tester:latest";

/// pytest runner; the test module imports from `solution`
pub struct PythonStrategy {
    settings: StrategySettings,
}

impl PythonStrategy {
    pub fn new(settings: StrategySettings) -> Self {
        Self { settings }
    }

    pub fn from_languages(languages: &LanguageConfigManager, archive: RawResultsArchive) -> Self {
        Self::new(StrategySettings::resolve(
            Language::Python,
            PYTHON_TESTER_IMAGE,
            languages,
            archive,
        ))
    }
}

impl Default for PythonStrategy {
    fn default() -> Self {
        Self::new(StrategySettings::new(PYTHON_TESTER_IMAGE))
    }
}

impl LanguageStrategy for PythonStrategy {
    fn language(&self) -> Language {
        Language::Python
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn result_profile(&self) -> ResultProfile {
        ResultProfile {
            language: Language::Python,
            format: ReportFormat::Pytest,
            rules: FailureRules::python(),
            policy: ReconcilePolicy::DeclaredCases,
            reports_timing: true,
        }
    }

    fn test_files(&self, user_code: &str, lesson: &Lesson) -> Vec<TestFile> {
        let test_config = &lesson.test_config;

        let mut files = vec![
            TestFile::new("solution.py", user_code),
            TestFile::new("test_solution.py", test_config.test_template.clone()),
        ];
        files.extend(override_files(
            Language::Python,
            test_config,
            self.settings.image_default_timeout_ms,
        ));
        files
    }
}
