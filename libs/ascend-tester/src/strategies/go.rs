use crate::config::LanguageConfigManager;
use crate::diagnostics::RawResultsArchive;
use crate::fallback::FailureRules;
use crate::files::{override_files, TestFile, GO_MOD_CONTENT};
use crate::pipeline::ResultProfile;
use crate::reconcile::ReconcilePolicy;
use crate::report::ReportFormat;
use crate::strategy::{LanguageStrategy, StrategySettings};
use ascend_common::types::{Language, Lesson};

pub const GO_TESTER_IMAGE: &str = "jhypki/ascenddev-go-tester:latest";

/// `go test` runner; submission and tests live side by side in module `solution`
pub struct GoStrategy {
    settings: StrategySettings,
}

impl GoStrategy {
    pub fn new(settings: StrategySettings) -> Self {
        Self { settings }
    }

    pub fn from_languages(languages: &LanguageConfigManager, archive: RawResultsArchive) -> Self {
        Self::new(StrategySettings::resolve(
            Language::Go,
            GO_TESTER_IMAGE,
            languages,
            archive,
        ))
    }
}

impl Default for GoStrategy {
    fn default() -> Self {
        Self::new(StrategySettings::new(GO_TESTER_IMAGE))
    }
}

impl LanguageStrategy for GoStrategy {
    fn language(&self) -> Language {
        Language::Go
    }

    fn settings(&self) -> &StrategySettings {
        &self.settings
    }

    fn result_profile(&self) -> ResultProfile {
        ResultProfile {
            language: Language::Go,
            format: ReportFormat::GoTest,
            rules: FailureRules::go(),
            policy: ReconcilePolicy::DeclaredCases,
            reports_timing: true,
        }
    }

    fn test_files(&self, user_code: &str, lesson: &Lesson) -> Vec<TestFile> {
        let test_config = &lesson.test_config;

        // go.mod is always rewritten, even if the directory already has one
        let mut files = vec![
            TestFile::new("solution.go", user_code),
            TestFile::new("solution_test.go", test_config.test_template.clone()),
            TestFile::new("go.mod", GO_MOD_CONTENT),
        ];
        files.extend(override_files(
            Language::Go,
            test_config,
            self.settings.image_default_timeout_ms,
        ));
        files
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ascend_common::types::TestConfig;

    #[test]
    fn test_template_is_not_substituted() {
        let lesson = Lesson {
            language: "go".to_string(),
            test_config: TestConfig {
                test_template: "package solution // __USER_CODE__".to_string(),
                timeout_ms: 2500,
                ..Default::default()
            },
            ..Default::default()
        };

        let files = GoStrategy::default().test_files("package solution", &lesson);
        let names: Vec<&str> = files.iter().map(|f| f.name).collect();

        assert_eq!(names, vec!["solution.go", "solution_test.go", "go.mod", "test-config.json"]);
        assert_eq!(files[1].contents, "package solution // __USER_CODE__");
        assert_eq!(files[3].contents, "{\n  \"timeout\": 3\n}");
    }
}
