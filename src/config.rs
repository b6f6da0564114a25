//! Configuration management for blogseek.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::repository::DbContext;

/// Database filename inside the data directory.
pub const DATABASE_FILE: &str = "blogseek.db";

/// Progress document filename inside the data directory.
pub const PROGRESS_FILE: &str = "crawl_progress.json";

/// Config filename searched in the working directory.
pub const CONFIG_FILE: &str = "blogseek.toml";

/// Browser-like User-Agent sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept-Language header for the target site.
pub const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

/// Fixed delays between requests, per request class.
///
/// The target site expects paced access; these are mandatory blocking waits
/// on the crawl worker, not adaptive backoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Pacing {
    /// Delay after each per-post request (content pages, list pages).
    pub post_delay_ms: u64,
    /// Delay after each blog-info request.
    pub blog_info_delay_ms: u64,
    /// Delay after each comment-page request.
    pub comment_delay_ms: u64,
    /// HTTP request timeout.
    pub request_timeout_secs: u64,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            post_delay_ms: 1500,
            blog_info_delay_ms: 2000,
            comment_delay_ms: 1000,
            request_timeout_secs: 15,
        }
    }
}

/// Runtime settings resolved from CLI flags, config file, and defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the database and the progress document.
    pub data_dir: PathBuf,
    /// Request pacing configuration.
    pub pacing: Pacing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            pacing: Pacing::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("blogseek"))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl Settings {
    /// Load settings: explicit config path, else `blogseek.toml` in the
    /// working directory, else defaults. A `--target` directory overrides
    /// `data_dir` regardless of where the rest of the config came from.
    pub fn load(config_path: Option<&Path>, target: Option<&Path>) -> Self {
        let mut settings = match config_path {
            Some(path) => Self::from_file(path).unwrap_or_default(),
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local).unwrap_or_default()
                } else {
                    Self::default()
                }
            }
        };

        if let Some(dir) = target {
            settings.data_dir = dir.to_path_buf();
        }

        settings
    }

    fn from_file(path: &Path) -> Option<Self> {
        let raw = fs::read_to_string(path).ok()?;
        match toml::from_str(&raw) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Path to the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Path to the JSON progress document.
    pub fn progress_path(&self) -> PathBuf {
        self.data_dir.join(PROGRESS_FILE)
    }

    /// Create the data directory if needed and open a database context.
    pub fn create_db_context(&self) -> anyhow::Result<DbContext> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(DbContext::new(&self.database_path()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.pacing.post_delay_ms, 1500);
        assert_eq!(settings.pacing.blog_info_delay_ms, 2000);
        assert_eq!(settings.pacing.comment_delay_ms, 1000);
    }

    #[test]
    fn test_target_overrides_data_dir() {
        let dir = tempdir().unwrap();
        let settings = Settings::load(None, Some(dir.path()));
        assert_eq!(settings.data_dir, dir.path());
        assert!(settings.database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(
            &path,
            "data_dir = \"/tmp/blogseek-test\"\n[pacing]\npost_delay_ms = 10\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path), None);
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/blogseek-test"));
        assert_eq!(settings.pacing.post_delay_ms, 10);
        // Unspecified pacing fields keep their defaults
        assert_eq!(settings.pacing.comment_delay_ms, 1000);
    }

    #[test]
    fn test_malformed_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "not [valid toml").unwrap();

        let settings = Settings::load(Some(&path), None);
        assert_eq!(settings.pacing.post_delay_ms, 1500);
    }
}
