//! Runtime settings loaded from a TOML file with environment overrides.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const CONFIG_ENV: &str = "DUTYLOG_CONFIG";
pub const BOT_TOKEN_ENV: &str = "DUTYLOG_BOT_TOKEN";
pub const CHAT_ID_ENV: &str = "DUTYLOG_CHAT_ID";
pub const DEFAULT_CONFIG_FILE: &str = "dutylog.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub storage: StorageConfig,
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
    pub console: ConsoleConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub csv_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("dutylog.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub api_base: String,
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            bot_token: None,
            chat_id: None,
            timeout_secs: 10,
        }
    }
}

impl NotificationConfig {
    /// Token and chat id, when both are present and non-blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let token = self.bot_token.as_deref().filter(|t| !t.trim().is_empty())?;
        let chat = self.chat_id.as_deref().filter(|c| !c.trim().is_empty())?;
        Some((token, chat))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            filter: "info,dutylog=debug".to_string(),
        }
    }
}

/// Identity the terminal console reports as.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub user_id: i64,
    pub chat_id: i64,
    pub chat_title: Option<String>,
    pub chat_kind: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            user_id: 1,
            chat_id: 1,
            chat_title: None,
            chat_kind: "private".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut settings = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        settings.apply_overrides(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Applies secrets from the environment over the file values.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(BOT_TOKEN_ENV) {
            self.notification.bot_token = Some(token);
        }
        if let Some(chat) = lookup(CHAT_ID_ENV) {
            self.notification.chat_id = Some(chat);
        }
    }
}

/// Config path: the first CLI argument, then `DUTYLOG_CONFIG`, then `dutylog.toml`.
pub fn resolve_config_path(arg: Option<String>, env: Option<String>) -> PathBuf {
    arg.or(env)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
