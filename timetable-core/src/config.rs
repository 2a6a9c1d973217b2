//! User configuration at ~/.config/timetable/config.toml
//!
//! Every field may also be set through a `TIMETABLE_<FIELD>` environment
//! variable, which takes precedence over the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FEED_URL;
use crate::error::{TimetableError, TimetableResult};

static DEFAULT_DATA_DIR: &str = "~/.local/share/timetable";

fn default_data_dir() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_DIR)
}

fn is_default_data_dir(p: &PathBuf) -> bool {
    *p == default_data_dir()
}

fn default_true() -> bool {
    true
}

fn is_true(b: &bool) -> bool {
    *b
}

fn default_sync_interval() -> u64 {
    15
}

fn is_default_sync_interval(m: &u64) -> bool {
    *m == default_sync_interval()
}

fn default_http_timeout() -> u64 {
    30
}

fn is_default_http_timeout(s: &u64) -> bool {
    *s == default_http_timeout()
}

fn is_false(b: &bool) -> bool {
    !*b
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimetableConfig {
    /// Feed to sync from. Empty means the built-in default.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub feed_url: String,

    #[serde(default = "default_data_dir", skip_serializing_if = "is_default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub auto_sync: bool,

    #[serde(
        default = "default_sync_interval",
        skip_serializing_if = "is_default_sync_interval"
    )]
    pub sync_interval_minutes: u64,

    #[serde(default, skip_serializing_if = "is_false")]
    pub notifications: bool,

    #[serde(
        default = "default_http_timeout",
        skip_serializing_if = "is_default_http_timeout"
    )]
    pub http_timeout_secs: u64,
}

impl Default for TimetableConfig {
    fn default() -> Self {
        TimetableConfig {
            feed_url: String::new(),
            data_dir: default_data_dir(),
            auto_sync: default_true(),
            sync_interval_minutes: default_sync_interval(),
            notifications: false,
            http_timeout_secs: default_http_timeout(),
        }
    }
}

impl TimetableConfig {
    pub fn config_path() -> TimetableResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| TimetableError::Config("Could not determine config directory".into()))?
            .join("timetable");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the config, writing a commented default file on first run.
    pub fn load() -> TimetableResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> TimetableResult<Self> {
        Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(Environment::with_prefix("TIMETABLE").try_parsing(true))
            .build()
            .map_err(|e| TimetableError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| TimetableError::Config(e.to_string()))
    }

    /// The configured feed URL, or the built-in one when none is set.
    pub fn feed_url(&self) -> &str {
        let url = self.feed_url.trim();
        if url.is_empty() { DEFAULT_FEED_URL } else { url }
    }

    pub fn set_feed_url(&mut self, url: &str) -> TimetableResult<()> {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(TimetableError::Config(format!(
                "Feed URL must start with http:// or https://, got '{url}'"
            )));
        }
        self.feed_url = url.to_string();
        Ok(())
    }

    /// Directory holding the cached snapshot and change ledger, with `~` expanded.
    pub fn data_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.data_dir.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync_interval_minutes.max(1) * 60)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Save the current config to ~/.config/timetable/config.toml
    pub fn save(&self) -> TimetableResult<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> TimetableResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| TimetableError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> TimetableResult<()> {
        let contents = format!(
            "\
# timetable configuration

# Calendar feed to sync from:
# feed_url = \"https://...\"

# Where the offline copy is kept:
# data_dir = \"{DEFAULT_DATA_DIR}\"

# Re-sync periodically while `timetable watch` runs:
# auto_sync = true
# sync_interval_minutes = 15

# Print an alert line for each change after a sync:
# notifications = false

# HTTP request timeout in seconds:
# http_timeout_secs = 30
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TimetableError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TimetableError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
