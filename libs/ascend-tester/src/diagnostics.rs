// Best-effort archive of raw results.json copies for post-mortem debugging.
// Never part of the parse error boundary: failures are logged and dropped.
use ascend_common::types::Language;
use ascend_common::Config;
use chrono::Utc;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct RawResultsArchive {
    dir: PathBuf,
    enabled: bool,
}

impl RawResultsArchive {
    pub fn new(dir: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            dir: dir.into(),
            enabled,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.diagnostics_dir.clone(), config.keep_raw_results)
    }

    pub fn disabled() -> Self {
        Self::new(PathBuf::new(), false)
    }

    pub fn file_name(language: Language) -> String {
        format!(
            "{}-results-{}.json",
            language,
            Utc::now().format("%Y%m%d%H%M%S")
        )
    }

    /// Returns the path written, if any
    pub async fn archive(&self, language: Language, content: &str) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }

        let path = self.dir.join(Self::file_name(language));
        match tokio::fs::write(&path, content).await {
            Ok(()) => {
                info!(path = %path.display(), "Raw test results saved");
                Some(path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to save raw test results");
                None
            }
        }
    }
}
