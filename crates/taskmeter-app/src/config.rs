use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow, bail};
use serde::{Deserialize, Serialize};
use taskmeter_store_fs::{DEFAULT_QUOTA_BYTES, FileStore};
use tracing::debug;

use crate::persistence::{DEFAULT_STORAGE_KEY, Persistence};
use crate::store::TaskStore;

const APP_DIR: &str = "taskmeter";
const CONFIG_FILE: &str = "config.toml";

/// Default configuration file path (`<config_dir>/taskmeter/config.toml`).
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

/// Storage and autosave settings loaded from `config.toml`.
///
/// Other tables in the same file (the TUI key bindings) are ignored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where and how snapshots are stored.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Periodic flush schedule.
    #[serde(default)]
    pub autosave: AutosaveConfig,
}

impl AppConfig {
    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    /// Load from an explicit file path.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read, parsed or validated.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file; using defaults");
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self =
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.storage.key.trim().is_empty() {
            bail!("storage.key must not be empty");
        }
        if self.autosave.interval_secs == 0 {
            bail!("autosave.interval_secs must be at least 1");
        }
        Ok(())
    }

    /// Directory holding the snapshot; `override_dir` wins over the file.
    ///
    /// # Errors
    /// Fails when no directory is configured and the platform has no data directory.
    pub fn data_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        if let Some(dir) = override_dir.or(self.storage.dir.as_deref()) {
            return Ok(dir.to_path_buf());
        }
        dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| anyhow!("failed to determine a data directory; pass --data-dir"))
    }

    /// Open the task store described by this configuration.
    ///
    /// # Errors
    /// Fails when the data directory cannot be resolved or created.
    pub fn open_store(&self, override_dir: Option<&Path>) -> Result<TaskStore<FileStore>> {
        let dir = self.data_dir(override_dir)?;
        let files = FileStore::open(&dir)
            .with_context(|| format!("failed to open data directory {}", dir.display()))?
            .with_quota(self.storage.quota_bytes);
        Ok(TaskStore::open(Persistence::new(files, self.storage.key.clone())))
    }

    /// Interval between periodic flushes.
    #[must_use]
    pub const fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave.interval_secs)
    }
}

/// `[storage]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory; defaults to `<data_dir>/taskmeter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Storage key of the snapshot.
    #[serde(default = "default_key")]
    pub key: String,
    /// Maximum snapshot size in bytes; `0` disables the limit.
    #[serde(default = "default_quota")]
    pub quota_bytes: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            quota_bytes: default_quota(),
        }
    }
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_owned()
}

const fn default_quota() -> usize {
    DEFAULT_QUOTA_BYTES
}

/// `[autosave]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutosaveConfig {
    /// Seconds between periodic flushes.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

const fn default_interval() -> u64 {
    crate::autosave::DEFAULT_AUTOSAVE_INTERVAL.as_secs()
}
