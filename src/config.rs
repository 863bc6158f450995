//! Configuration loading for Pink Tower.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. User config (`~/.pinktower/config.toml`)
//! 3. Defaults (lowest priority)
//!
//! All configuration is optional. The system runs with sensible defaults
//! when no config exists.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{FailOpen, PinkTowerError, Result};

/// Main configuration struct for Pink Tower.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Record storage configuration.
    pub storage: StorageConfig,
    /// Defaults applied when bootstrapping new records.
    pub defaults: DefaultsConfig,
    /// Parent-summary composition configuration.
    pub summary: SummaryConfig,
}

/// Record storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    /// Override for the data directory. When unset, records live under
    /// `<pinktower_home>/data/`.
    pub data_dir: Option<PathBuf>,
}

/// Defaults applied when bootstrapping new records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Name used when creating an organization without an explicit name.
    pub organization_name: String,
    /// Daily habits seeded onto every newly enrolled student.
    pub seed_habits: Vec<String>,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            organization_name: "My School".to_string(),
            seed_habits: vec!["Attended class".to_string()],
        }
    }
}

/// Parent-summary composition configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    /// Footer line appended to composed parent summaries.
    pub footer: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            footer: "Sent from Pink Tower".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with the full precedence chain.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. User config (`~/.pinktower/config.toml`)
    /// 3. Defaults
    pub fn load() -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.pinktower/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = pinktower_home()?;
        let config_path = home.join("config.toml");
        Self::load_from_file(&config_path).ok()
    }

    /// Load config from a specific file path.
    fn load_from_file(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path).map_err(|e| PinkTowerError::storage(path, e))?;
        toml::from_str(&content).map_err(|e| PinkTowerError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        // PINKTOWER_DATA_DIR
        if let Ok(val) = env::var("PINKTOWER_DATA_DIR") {
            if val.is_empty() {
                eprintln!("Warning: PINKTOWER_DATA_DIR is empty, ignoring.");
            } else {
                self.storage.data_dir = Some(PathBuf::from(val));
            }
        }

        // PINKTOWER_ORG_NAME
        if let Ok(val) = env::var("PINKTOWER_ORG_NAME") {
            if val.trim().is_empty() {
                eprintln!(
                    "Warning: PINKTOWER_ORG_NAME is empty. Using default '{}'.",
                    self.defaults.organization_name
                );
            } else {
                self.defaults.organization_name = val;
            }
        }

        // PINKTOWER_SEED_HABITS (comma-separated list; empty clears seeding)
        if let Ok(val) = env::var("PINKTOWER_SEED_HABITS") {
            self.defaults.seed_habits = val
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        // PINKTOWER_SUMMARY_FOOTER
        if let Ok(val) = env::var("PINKTOWER_SUMMARY_FOOTER") {
            self.summary.footer = val;
        }
    }

    /// Merge another config into this one.
    ///
    /// The `other` config takes precedence. Non-default fields from
    /// `other` are applied to `self`, enabling additive layering where
    /// each layer only specifies its customizations.
    fn merge(mut self, other: Config) -> Self {
        if other.storage.data_dir.is_some() {
            self.storage.data_dir = other.storage.data_dir;
        }

        let default_defaults = DefaultsConfig::default();
        if other.defaults.organization_name != default_defaults.organization_name {
            self.defaults.organization_name = other.defaults.organization_name;
        }
        if other.defaults.seed_habits != default_defaults.seed_habits {
            self.defaults.seed_habits = other.defaults.seed_habits;
        }

        if other.summary.footer != SummaryConfig::default().footer {
            self.summary.footer = other.summary.footer;
        }

        self
    }

    /// Load config with fail-open behavior.
    ///
    /// If loading fails for any reason, returns defaults.
    pub fn load_fail_open() -> Self {
        let result: Result<Self> = Ok(Self::load());
        result.fail_open_default("loading config")
    }

    /// Resolve the data directory: the configured override if present,
    /// otherwise `<pinktower_home>/data/`.
    pub fn resolved_data_dir(&self) -> Option<PathBuf> {
        match &self.storage.data_dir {
            Some(dir) => Some(dir.clone()),
            None => data_dir(),
        }
    }
}

/// Get the Pink Tower home directory.
///
/// Checks `PINKTOWER_HOME` environment variable first, then falls back
/// to `~/.pinktower`.
///
/// If `PINKTOWER_HOME` is set it must be non-empty; relative paths are
/// canonicalized when possible. Invalid values are ignored and we fall
/// back to the default.
pub fn pinktower_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("PINKTOWER_HOME") {
        if home.is_empty() {
            tracing::warn!("PINKTOWER_HOME is empty, using default");
        } else {
            let path = PathBuf::from(&home);
            if path.is_absolute() {
                return Some(path);
            }
            if let Ok(canonical) = path.canonicalize() {
                return Some(canonical);
            }
            tracing::warn!("PINKTOWER_HOME is relative and doesn't exist, using as-is");
            return Some(path);
        }
    }

    // Fall back to ~/.pinktower
    if let Some(home) = dirs::home_dir() {
        return Some(home.join(".pinktower"));
    }

    // Fallback for containerized/minimal environments without HOME
    let fallback_path = fallback_pinktower_home();
    tracing::warn!(
        "HOME not set, using fallback location: {}",
        fallback_path.display()
    );
    Some(fallback_path)
}

/// Get fallback home path when HOME is unavailable.
#[cfg(unix)]
fn fallback_pinktower_home() -> PathBuf {
    use std::os::unix::fs::MetadataExt;
    let uid = std::fs::metadata("/").map(|m| m.uid()).unwrap_or(0);
    PathBuf::from(format!("/tmp/pinktower-{}", uid))
}

/// Get fallback home path when HOME is unavailable.
#[cfg(not(unix))]
fn fallback_pinktower_home() -> PathBuf {
    std::env::temp_dir().join("pinktower")
}

/// Get the record data directory.
///
/// Returns `<pinktower_home>/data/`.
pub fn data_dir() -> Option<PathBuf> {
    pinktower_home().map(|h| h.join("data"))
}

/// Get the device identity file path.
///
/// Returns `<pinktower_home>/identity`.
pub fn identity_path() -> Option<PathBuf> {
    pinktower_home().map(|h| h.join("identity"))
}
