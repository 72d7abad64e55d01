use crate::config::LanguageConfigManager;
use crate::container::ContainerConfig;
use crate::diagnostics::RawResultsArchive;
use crate::files::{write_test_files, TestFile};
use crate::pipeline::{self, ExecutionArtifacts, ResultProfile};
use crate::strategies::{CSharpStrategy, GoStrategy, PythonStrategy, TypeScriptStrategy};
use anyhow::{bail, Result};
use ascend_common::types::{Language, Lesson, TestConfig, TestResult, DEFAULT_TIMEOUT_MS};
use ascend_common::Config;
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Per-strategy values resolved once at startup
#[derive(Debug, Clone)]
pub struct StrategySettings {
    pub image: String,
    /// Timeout baked into the tester image; overrides are only written when the lesson differs
    pub image_default_timeout_ms: u64,
    pub archive: RawResultsArchive,
}

impl StrategySettings {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            image_default_timeout_ms: DEFAULT_TIMEOUT_MS,
            archive: RawResultsArchive::disabled(),
        }
    }

    /// Image from the language config when present, built-in otherwise
    pub fn resolve(
        language: Language,
        fallback_image: &str,
        languages: &LanguageConfigManager,
        archive: RawResultsArchive,
    ) -> Self {
        let image = languages
            .get_image(&language)
            .unwrap_or_else(|| fallback_image.to_string());

        debug!(language = %language, image = %image, "Resolved tester image");

        Self {
            image,
            image_default_timeout_ms: languages.get_default_timeout_ms(&language),
            archive,
        }
    }
}

/// One implementation per supported language
///
/// Stateless across calls: the same inputs always produce the same files,
/// the same container config and the same result.
#[async_trait]
pub trait LanguageStrategy: Send + Sync {
    fn language(&self) -> Language;

    fn settings(&self) -> &StrategySettings;

    /// Language-specific knobs of the result pipeline
    fn result_profile(&self) -> ResultProfile;

    /// Complete file set for one execution, overrides included
    fn test_files(&self, user_code: &str, lesson: &Lesson) -> Vec<TestFile>;

    fn image(&self) -> &str {
        &self.settings().image
    }

    /// Case-insensitive match on the canonical identifier
    fn supports_language(&self, language: &str) -> bool {
        language.eq_ignore_ascii_case(self.language().identifier())
    }

    async fn prepare_test_files(
        &self,
        execution_dir: &Path,
        user_code: &str,
        lesson: &Lesson,
    ) -> Result<()> {
        let files = self.test_files(user_code, lesson);
        info!(
            language = %self.language(),
            dir = %execution_dir.display(),
            files = files.len(),
            "Preparing test files"
        );
        write_test_files(execution_dir, &files).await
    }

    fn create_container_config(
        &self,
        container_name: &str,
        execution_dir: &Path,
        lesson: &Lesson,
    ) -> ContainerConfig {
        ContainerConfig::for_lesson(self.image(), container_name, execution_dir, lesson)
    }

    async fn process_execution_result(
        &self,
        artifacts: ExecutionArtifacts<'_>,
        test_config: &TestConfig,
    ) -> TestResult {
        pipeline::process_execution_result(
            &self.result_profile(),
            &self.settings().archive,
            artifacts,
            test_config,
        )
        .await
    }
}

/// Lookup table from language name to strategy
pub struct StrategyRegistry {
    strategies: Vec<Box<dyn LanguageStrategy>>,
}

impl StrategyRegistry {
    pub fn new(strategies: Vec<Box<dyn LanguageStrategy>>) -> Self {
        Self { strategies }
    }

    /// All four built-in strategies
    pub fn with_defaults(config: &Config, languages: &LanguageConfigManager) -> Self {
        let archive = RawResultsArchive::from_config(config);
        Self::new(vec![
            Box::new(CSharpStrategy::from_languages(languages, archive.clone())),
            Box::new(GoStrategy::from_languages(languages, archive.clone())),
            Box::new(PythonStrategy::from_languages(languages, archive.clone())),
            Box::new(TypeScriptStrategy::from_languages(languages, archive)),
        ])
    }

    pub fn get_strategy(&self, language: &str) -> Result<&dyn LanguageStrategy> {
        if language.trim().is_empty() {
            bail!("Language cannot be null or empty");
        }

        match self.strategies.iter().find(|s| s.supports_language(language)) {
            Some(strategy) => Ok(strategy.as_ref()),
            None => bail!("Language '{}' is not supported", language),
        }
    }

    pub fn strategies(&self) -> impl Iterator<Item = &dyn LanguageStrategy> {
        self.strategies.iter().map(|s| s.as_ref())
    }

    pub fn supported_languages(&self) -> Vec<Language> {
        self.strategies().map(|s| s.language()).collect()
    }
}
