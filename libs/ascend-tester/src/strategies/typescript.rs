use crate::config::LanguageConfigManager;
use crate::diagnostics::RawResultsArchive;
use crate::fallback::FailureRules;
use crate::files::{embed_user_code, override_files, TestFile};
use crate::pipeline::ResultProfile;
use crate::reconcile::ReconcilePolicy;
use crate::report::ReportFormat;
use crate::strategy::{LanguageStrategy, StrategySettings};
use ascend_common::types::{Language, Lesson};

pub const TYPESCRIPT_TESTER_IMAGE: &str = "jhypki/ascenddev-typescript-tester:latest";

/// Jest (ts-jest) runner; the submission is embedded into the Jest test file
pub struct TypeScriptStrategy {
    settings: StrategySettings,
}

impl TypeScriptStrategy {
    pub fn new(settings: StrategySettings) -> Self {
        Self { settings }
    }

    pub fn from_languages(languages: &LanguageConfigManager, archive: RawResultsArchive) -> Self {
        Self::new(StrategySettings::resolve(
            Language::TypeScript,
            TYPESCRIPT_TESTER_IMAGE,
            languages,
            archive,
        ))
    }
}

impl Default for TypeScriptStrategy {
    fn default() -> Self {
        Self::new(StrategySettings::new(TYPESCRIPT_TESTER_IMAGE))
    }
}

impl LanguageStrategy for TypeScriptStrategy {
    fn language(&self) -> Language {
        Language::TypeScript
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn result_profile(&self) -> ResultProfile {
        ResultProfile {
            language: Language::TypeScript,
            format: ReportFormat::Jest,
            rules: FailureRules::typescript(),
            policy: ReconcilePolicy::DeclaredCases,
            reports_timing: false,
        }
    }

    fn test_files(&self, user_code: &str, lesson: &Lesson) -> Vec<TestFile> {
        let test_config = &lesson.test_config;

        let mut files = vec![TestFile::new(
            "test.spec.ts",
            embed_user_code(&test_config.test_template, user_code),
        )];
        files.extend(override_files(
            Language::TypeScript,
            test_config,
            self.settings.image_default_timeout_ms,
        ));
        files
    }
}
