//! Application configuration from the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;
use vocab_core::types::SchedulerConfig;

/// Optional scheduler tuning file inside the data directory.
pub const SCHEDULER_FILE: &str = "scheduler.json";

const APP_DIR: &str = "word-review";
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scheduler config in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Holds the word file, backup database, backup flag and log.
    pub data_dir: PathBuf,
    pub lookup_timeout: Duration,
    pub backup_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            lookup_timeout: Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS),
            backup_enabled: true,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
        }),
    }
}

impl AppConfig {
    /// Read `VOCAB_*` variables, after loading `.env` if one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable source. Unset variables take their defaults.
    pub fn from_lookup<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = get("VOCAB_DATA_DIR").filter(|d| !d.trim().is_empty()) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(secs) = get("VOCAB_LOOKUP_TIMEOUT_SECS") {
            let parsed = secs.trim().parse::<u64>().ok().filter(|s| *s > 0);
            let secs = parsed.ok_or(ConfigError::Invalid {
                var: "VOCAB_LOOKUP_TIMEOUT_SECS",
                value: secs,
            })?;
            config.lookup_timeout = Duration::from_secs(secs);
        }
        if let Some(flag) = get("VOCAB_BACKUP_ENABLED") {
            config.backup_enabled = parse_bool("VOCAB_BACKUP_ENABLED", &flag)?;
        }

        Ok(config)
    }

    /// Config rooted at `data_dir` with default settings otherwise.
    pub fn with_data_dir<P: Into<PathBuf>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn backup_db_path(&self) -> PathBuf {
        self.data_dir.join(crate::backup::BACKUP_DB_FILE)
    }

    pub fn scheduler_path(&self) -> PathBuf {
        self.data_dir.join(SCHEDULER_FILE)
    }

    /// Scheduler tuning from [`SCHEDULER_FILE`], or defaults when absent.
    /// Fields missing from the file keep their defaults.
    pub fn load_scheduler_config(&self) -> Result<SchedulerConfig, ConfigError> {
        let path = self.scheduler_path();
        if !path.exists() {
            return Ok(SchedulerConfig::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json { path, source })
    }
}
