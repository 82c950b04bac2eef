//! Configuration file parser for `feedcast.toml`.
//!
//! The config file is optional: a missing file yields `Config::default()`,
//! and the bot credentials may come from the environment alone.
//! Unknown keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use crate::publish::telegram::DEFAULT_API_BASE;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Env var naming the config file.
pub const CONFIG_PATH_ENV: &str = "FEEDCAST_CONFIG";
/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "feedcast.toml";

const TOKEN_ENV: &str = "TELEGRAM_TOKEN";
const CHANNEL_ENV: &str = "TELEGRAM_CHANNEL_ID";
const POSTED_LINKS_ENV: &str = "FEEDCAST_POSTED_LINKS";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// SEC-014: Config file exceeds maximum allowed size.
    #[error("Config file too large: {0}")]
    TooLarge(String),

    /// A required setting is absent from both the file and the environment.
    #[error("Missing {0}: set it in the config file or the environment")]
    MissingCredential(&'static str),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
///
/// SEC-015: Custom Debug impl masks `telegram_token` to prevent secret leakage
/// in logs, error messages, and debug output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where announced links are remembered between runs.
    pub posted_links_file: PathBuf,

    /// Bot API base URL. Only changed for testing.
    pub telegram_api_base: String,

    /// Bot token (alternative to TELEGRAM_TOKEN env var).
    /// Env var takes precedence over config file.
    pub telegram_token: Option<String>,

    /// Target chat, e.g. `@mychannel` or a numeric id
    /// (alternative to TELEGRAM_CHANNEL_ID env var).
    pub telegram_channel_id: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            posted_links_file: PathBuf::from("posted_links.txt"),
            telegram_api_base: DEFAULT_API_BASE.to_string(),
            telegram_token: None,
            telegram_channel_id: None,
        }
    }
}

/// SEC-015: Mask telegram_token in Debug output to prevent secret leakage.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("posted_links_file", &self.posted_links_file)
            .field("telegram_api_base", &self.telegram_api_base)
            .field(
                "telegram_token",
                &self.telegram_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("telegram_channel_id", &self.telegram_channel_id)
            .finish()
    }
}

/// Bot token and target chat, both present.
pub struct Credentials {
    pub token: SecretString,
    pub channel_id: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"[REDACTED]")
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

impl Config {
    /// SEC-014: Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = [
        "posted_links_file",
        "telegram_api_base",
        "telegram_token",
        "telegram_channel_id",
    ];

    /// Path of the config file: `$FEEDCAST_CONFIG`, else `feedcast.toml`.
    pub fn path_from_env() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load the config file at `path`, then apply environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        // SEC-014: Check file size before reading to prevent memory exhaustion
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race condition: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            posted_links_file = %config.posted_links_file.display(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Applies environment overrides read through `lookup`. Empty values are
    /// treated as unset.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(TOKEN_ENV) {
            self.telegram_token = Some(token);
        }
        if let Some(channel) = get(CHANNEL_ENV) {
            self.telegram_channel_id = Some(channel);
        }
        if let Some(path) = get(POSTED_LINKS_ENV) {
            self.posted_links_file = PathBuf::from(path);
        }
    }

    /// The bot token and channel, or the name of the first one missing.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let token = non_empty(self.telegram_token.as_deref())
            .ok_or(ConfigError::MissingCredential("telegram_token"))?;
        let channel_id = non_empty(self.telegram_channel_id.as_deref())
            .ok_or(ConfigError::MissingCredential("telegram_channel_id"))?;

        Ok(Credentials {
            token: SecretString::from(token.to_string()),
            channel_id: channel_id.to_string(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
