use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Result, TellerError};

/// Application configuration, one section per concern.
///
/// Read from `~/.teller/config.toml` unless overridden. Missing sections
/// and fields fall back to their defaults, so a partial file is fine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TellerConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub nlu: NluConfig,
}

impl TellerConfig {
    /// Parse a TOML config file; unreadable or invalid files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: TellerConfig = toml::from_str(&content)?;
        info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Like [`load`](Self::load), but any failure logs a warning and
    /// yields the default configuration instead.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Config unusable, using defaults");
            Self::default()
        })
    }

    /// Write the configuration back out as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| TellerError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory holding the SQLite database file.
    pub data_dir: String,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
    /// API server port.
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.teller/data".to_string(),
            log_level: "info".to_string(),
            port: 4040,
        }
    }
}

/// Session authentication settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Minutes of inactivity after which a login session expires.
    pub session_timeout_minutes: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_timeout_minutes: 30,
        }
    }
}

/// Chat engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Maximum chat message length in characters.
    pub max_message_length: usize,
    /// Default number of transactions returned by "last transactions".
    pub transactions_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            max_message_length: 2000,
            transactions_limit: 5,
        }
    }
}

/// Intent classifier settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NluConfig {
    /// Optional path to a `text,intent,response` CSV overriding the
    /// built-in training corpus.
    pub training_data: Option<String>,
}
