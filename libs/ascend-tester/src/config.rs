// Tester image configuration loaded from languages.json
use anyhow::{bail, Context, Result};
use ascend_common::types::{Language, DEFAULT_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub name: String,
    #[serde(default)]
    pub version: String,
    pub image: String,
    /// Timeout baked into the image's run script
    #[serde(default = "default_timeout_ms")]
    pub default_timeout_ms: u64,
}

#[derive(Debug, Serialize, Deserialize)]
struct LanguagesJson {
    languages: Vec<LanguageConfig>,
}

/// Language configuration manager
#[derive(Debug, Clone, Default)]
pub struct LanguageConfigManager {
    configs: HashMap<Language, LanguageConfig>,
}

impl LanguageConfigManager {
    /// Load language configurations from languages.json
    pub fn load(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            bail!("Language config file not found: {}", config_path.display());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        Self::from_json(&content)
    }

    /// Load from path, falling back to built-in images when the file is absent
    pub fn load_or_default(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            Self::load(config_path)
        } else {
            debug!(path = %config_path.display(), "No languages.json, using built-in images");
            Ok(Self::default())
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let languages_json: LanguagesJson =
            serde_json::from_str(content).context("Failed to parse languages.json")?;

        let mut configs = HashMap::new();
        for lang in languages_json.languages {
            let Some(language) = Language::from_str(&lang.name) else {
                bail!("Unknown language '{}' in languages.json", lang.name);
            };
            configs.insert(language, lang);
        }

        Ok(Self { configs })
    }

    /// Get configuration for a specific language
    pub fn get_config(&self, language: &Language) -> Option<&LanguageConfig> {
        self.configs.get(language)
    }

    /// Get Docker image for a language, if configured
    pub fn get_image(&self, language: &Language) -> Option<String> {
        self.get_config(language).map(|c| c.image.clone())
    }

    /// Timeout the image assumes without an override file
    pub fn get_default_timeout_ms(&self, language: &Language) -> u64 {
        self.get_config(language)
            .map(|c| c.default_timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS)
    }

    /// List all configured languages
    pub fn list_languages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.configs.keys().map(|l| l.to_string()).collect();
        names.sort();
        names
    }
}
