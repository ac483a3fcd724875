use crate::error::config::ConfigError;

use common::ErrorLocation;

use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use url::Url;

pub const CONFIG_FILE_NAME: &str = "catalog-client.toml";
const CONFIG_DIR_NAME: &str = "catalog-client";

pub const API_URL_ENV: &str = "CATALOG_API_URL";
pub const TIMEOUT_ENV: &str = "CATALOG_API_TIMEOUT_SECS";
pub const LANGUAGE_ENV: &str = "CATALOG_LANGUAGE";
pub const ACCESS_TOKEN_ENV: &str = "CATALOG_ACCESS_TOKEN";

const DEFAULT_API_HOST: &str = "127.0.0.1";
const DEFAULT_API_PORT: &str = "3000";
pub const DEFAULT_BASE_URL: &str =
    const_format::concatcp!("http://", DEFAULT_API_HOST, ":", DEFAULT_API_PORT, "/api");

const MAX_TIMEOUT_SECS: u64 = 300;
/// A call never gets more than one blind retry; `0` switches them off.
const MAX_BLIND_RETRIES_CEILING: u32 = 1;

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// `1` grants the single blind retry to calls with `max_retries > 0`; `0` disables it.
    #[serde(default = "default_max_blind_retries")]
    pub max_blind_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            max_blind_retries: default_max_blind_retries(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Sent as `Accept-Language` when a call does not pick its own.
    #[serde(default)]
    pub default_language: Option<String>,

    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            default_language: None,
            retry: RetryConfig::default(),
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_initial_delay_ms() -> u64 {
    200
}
fn default_max_delay_ms() -> u64 {
    2_000
}
fn default_max_blind_retries() -> u32 {
    1
}

// ============================================
// IMPLEMENTATION
// ============================================

impl ClientConfig {
    /// Platform config directory, e.g. `~/.config/catalog-client`.
    pub fn default_dir() -> Result<PathBuf, ConfigError> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME))
            .ok_or_else(|| ConfigError::DirectoryNotFound {
                location: ErrorLocation::from(Location::caller()),
            })
    }

    /// Load config from {config_dir}/catalog-client.toml.
    ///
    /// # Returns
    ///
    /// Returns defaults if the file is missing.
    /// Returns `Err(ConfigError)` if the file exists but is unreadable or invalid.
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            info!(
                "Config file not found at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path).map_err(|e| {
            warn!("Failed to read config file: {}", e);
            ConfigError::ReadError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                source: e,
            }
        })?;

        let config: ClientConfig = toml::from_str(&contents).map_err(|e| {
            warn!("Failed to parse config TOML: {}", e);
            ConfigError::ParseError {
                location: ErrorLocation::from(Location::caller()),
                path: config_path.clone(),
                reason: e.to_string(),
            }
        })?;

        config.validate()?;

        info!("Config loaded from {}", config_path.display());
        Ok(config)
    }

    /// Load `.env` from the working directory (if any), then apply
    /// `CATALOG_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => info!("Loaded .env from: {:?}", path),
            Err(e) if e.not_found() => debug!("No .env file found"),
            Err(e) => warn!("Failed to parse .env: {}", e),
        }

        self.apply_overrides(|key| std::env::var(key).ok())?;
        self.validate()
    }

    /// Apply overrides from an arbitrary key lookup.
    pub(crate) fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(url) = read(API_URL_ENV) {
            self.base_url = url.trim().to_string();
        }

        if let Some(raw) = read(TIMEOUT_ENV) {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::EnvError {
                location: ErrorLocation::from(Location::caller()),
                variable: TIMEOUT_ENV.to_string(),
                reason: format!("expected whole seconds, got '{raw}'"),
            })?;
        }

        if let Some(language) = read(LANGUAGE_ENV) {
            self.default_language = Some(language.trim().to_string());
        }

        Ok(())
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::ValidationError {
            location: ErrorLocation::from(Location::caller()),
            reason,
        };

        let url = Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(invalid(format!(
                "base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(invalid(format!(
                "Invalid timeout: {}s (must be 1-{MAX_TIMEOUT_SECS})",
                self.timeout_secs
            )));
        }

        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(invalid(format!(
                "retry.initial_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.initial_delay_ms, self.retry.max_delay_ms
            )));
        }

        if self.retry.max_blind_retries > MAX_BLIND_RETRIES_CEILING {
            return Err(invalid(format!(
                "retry.max_blind_retries {} exceeds {MAX_BLIND_RETRIES_CEILING}",
                self.retry.max_blind_retries
            )));
        }

        if let Some(language) = &self.default_language {
            if language.trim().is_empty() {
                return Err(invalid(
                    "default_language cannot be empty string".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
