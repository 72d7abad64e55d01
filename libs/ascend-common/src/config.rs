use std::env;
use std::path::PathBuf;

/// Application configuration
/// Provides defaults with environment variable overrides
#[derive(Debug, Clone)]
pub struct Config {
    /// Where raw results.json copies are archived for post-mortem
    pub diagnostics_dir: PathBuf,
    pub keep_raw_results: bool,
    pub languages_config: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            diagnostics_dir: env::var("ASCEND_DIAGNOSTICS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            keep_raw_results: env::var("ASCEND_KEEP_RAW_RESULTS")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(true),
            languages_config: env::var("ASCEND_LANGUAGES_CONFIG")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("config/languages.json")),
        }
    }

    pub fn new() -> Self {
        Self::from_env()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" OFF "), Some(false));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert!(!config.languages_config.as_os_str().is_empty());
    }
}
