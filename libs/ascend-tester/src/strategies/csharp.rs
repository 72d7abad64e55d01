use crate::config::LanguageConfigManager;
use crate::diagnostics::RawResultsArchive;
use crate::fallback::FailureRules;
use crate::files::{embed_user_code, override_files, TestFile};
use crate::pipeline::ResultProfile;
use crate::reconcile::ReconcilePolicy;
use crate::report::ReportFormat;
use crate::strategy::{LanguageStrategy, StrategySettings};
use ascend_common::types::{Language, Lesson};

pub const CSHARP_TESTER_IMAGE: &str = "jhypki/ascenddev-csharp-tester:latest";

/// xUnit runner; the submission is embedded into the test template
pub struct CSharpStrategy {
    settings: StrategySettings,
}

impl CSharpStrategy {
    pub fn new(settings: StrategySettings) -> Self {
        Self { settings }
    }

    pub fn from_languages(languages: &LanguageConfigManager, archive: RawResultsArchive) -> Self {
        Self::new(StrategySettings::resolve(
            Language::CSharp,
            CSHARP_TESTER_IMAGE,
            languages,
            archive,
        ))
    }
}

impl Default for CSharpStrategy {
    fn default() -> Self {
        Self::new(StrategySettings::new(CSHARP_TESTER_IMAGE))
    }
}

impl LanguageStrategy for CSharpStrategy {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn result_profile(&self) -> ResultProfile {
        ResultProfile {
            language: Language::CSharp,
            format: ReportFormat::XUnit,
            rules: FailureRules::csharp(),
            // Declared cases are not used to synthesize failures for xUnit
            policy: ReconcilePolicy::DefaultOnly,
            reports_timing: false,
        }
    }

    fn test_files(&self, user_code: &str, lesson: &Lesson) -> Vec<TestFile> {
        let test_config = &lesson.test_config;

        let mut files = vec![TestFile::new(
            "UserSolution.cs",
            embed_user_code(&test_config.test_template, user_code),
        )];
        files.extend(override_files(
            Language::CSharp,
            test_config,
            self.settings.image_default_timeout_ms,
        ));
        files
    }
}
