//! Configuration loading, validation, and management for Leadline.
//!
//! Loads configuration from `~/.leadline/config.toml` with environment
//! variable overrides. Validates all settings at startup.

pub mod knowledge;

pub use knowledge::{FaqEntry, KnowledgeBase};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.leadline/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Lead store settings
    #[serde(default)]
    pub store: StoreConfig,

    /// Knowledge base (FAQ) settings
    #[serde(default)]
    pub knowledge: KnowledgeConfig,

    /// Who the assistant presents itself as
    #[serde(default)]
    pub persona: PersonaConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the JSON lead database
    #[serde(default = "default_store_path")]
    pub path: PathBuf,

    /// Longest a commit waits for exclusive access to the store
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,

    /// Whether `submit_lead_and_end` persists leads that are not qualified yet.
    /// Partial leads are kept by default.
    #[serde(default = "default_true")]
    pub allow_unqualified_commit: bool,
}

fn default_store_path() -> PathBuf {
    AppConfig::config_dir().join("leads_db.json")
}
fn default_lock_timeout_ms() -> u64 {
    5000
}
fn default_true() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
            lock_timeout_ms: default_lock_timeout_ms(),
            allow_unqualified_commit: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// FAQ file; written with built-in answers when missing
    #[serde(default = "default_faq_path")]
    pub faq_path: PathBuf,
}

fn default_faq_path() -> PathBuf {
    AppConfig::config_dir().join("store_faq.json")
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            faq_path: default_faq_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    #[serde(default = "default_company")]
    pub company: String,

    #[serde(default = "default_role")]
    pub role: String,
}

fn default_agent_name() -> String {
    "Liam".into()
}
fn default_company() -> String {
    "Bikeya Company".into()
}
fn default_role() -> String {
    "Custom Bike Consultant".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            agent_name: default_agent_name(),
            company: default_company(),
            role: default_role(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.leadline/config.toml).
    ///
    /// Environment variables override the file:
    /// - `LEADLINE_STORE_PATH`
    /// - `LEADLINE_FAQ_PATH`
    /// - `LEADLINE_ALLOW_UNQUALIFIED` (`true`/`false`/`1`/`0`)
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(path) = std::env::var("LEADLINE_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("LEADLINE_FAQ_PATH") {
            self.knowledge.faq_path = PathBuf::from(path);
        }

        if let Ok(raw) = std::env::var("LEADLINE_ALLOW_UNQUALIFIED") {
            self.store.allow_unqualified_commit = parse_bool(&raw).ok_or_else(|| {
                ConfigError::ValidationError(format!(
                    "LEADLINE_ALLOW_UNQUALIFIED must be true or false, got '{raw}'"
                ))
            })?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    ///
    /// `LEADLINE_HOME` replaces the default `~/.leadline`.
    pub fn config_dir() -> PathBuf {
        match std::env::var("LEADLINE_HOME") {
            Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => dirs_home().join(".leadline"),
        }
    }

    /// Path of the config file inside [`AppConfig::config_dir`].
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("store.path must not be empty".into()));
        }

        if self.store.lock_timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "store.lock_timeout_ms must be > 0".into(),
            ));
        }

        if self.knowledge.faq_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "knowledge.faq_path must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
