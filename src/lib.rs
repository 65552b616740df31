pub mod api;
pub mod db;
pub mod delivery;
pub mod entities;
pub mod error;
pub mod logging;
pub mod rate_limit;
pub mod webhook;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, broadcast};

use crate::db::DeliveryStore;
use crate::delivery::Delivery;
use crate::error::{HookguardError, Result};
use crate::rate_limit::RateLimiter;
use crate::webhook::Webhooks;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8890";
const DEFAULT_DATABASE_PATH: &str = "data/hookguard.db";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_LOG_FILES: usize = 5;
const DEFAULT_SIGNATURE_HEADER: &str = "Paddle-Signature";
const DEFAULT_RATE_LIMIT: usize = 60;
const DEFAULT_RATE_LIMIT_WINDOW_SECS: u64 = 60;
const DELIVERY_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct HookguardConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub endpoint: Vec<EndpointConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: default_database_path(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Directory for daily rolling log files; console only when unset
    pub directory: Option<PathBuf>,
    pub max_files: Option<usize>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
            max_files: None,
        }
    }
}

impl LoggingConfig {
    pub fn get_max_files(&self) -> usize {
        self.max_files.unwrap_or(DEFAULT_MAX_LOG_FILES)
    }
}

/// A named receiving route with its own secret and limits
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    pub name: String,
    pub secret: Option<String>,
    /// Name of an environment variable holding the secret, used when `secret` is unset
    pub secret_env: Option<String>,
    pub signature_header: Option<String>,
    pub max_clock_skew_secs: Option<u64>,
    pub rate_limit: Option<usize>,
    pub rate_limit_window: Option<u64>,
}

impl EndpointConfig {
    /// Returns the configured secret, falling back to `secret_env`.
    /// Empty values count as missing.
    pub fn resolve_secret(&self) -> Option<String> {
        self.secret
            .clone()
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.secret_env
                    .as_ref()
                    .and_then(|var| std::env::var(var).ok())
                    .filter(|s| !s.is_empty())
            })
    }

    pub fn get_signature_header(&self) -> &str {
        self.signature_header
            .as_deref()
            .unwrap_or(DEFAULT_SIGNATURE_HEADER)
    }

    pub fn get_rate_limit(&self) -> usize {
        self.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT)
    }

    pub fn get_rate_limit_window(&self) -> u64 {
        self.rate_limit_window
            .unwrap_or(DEFAULT_RATE_LIMIT_WINDOW_SECS)
    }

    /// Builds the verifier for this endpoint
    pub fn webhooks(&self) -> Result<Webhooks> {
        let secret = self.resolve_secret().ok_or_else(|| {
            HookguardError::ConfigError(format!("Endpoint '{}' has no webhook secret", self.name))
        })?;
        let webhooks = Webhooks::new(secret);
        Ok(match self.max_clock_skew_secs {
            Some(secs) => webhooks.with_max_clock_skew(Duration::from_secs(secs)),
            None => webhooks,
        })
    }
}

impl HookguardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: HookguardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for endpoint in &self.endpoint {
            if endpoint.name.trim().is_empty() {
                return Err(HookguardError::ConfigError(
                    "Endpoint name must not be empty".to_string(),
                ));
            }
            if !seen.insert(endpoint.name.as_str()) {
                return Err(HookguardError::ConfigError(format!(
                    "Duplicate endpoint name '{}'",
                    endpoint.name
                )));
            }
            if endpoint.get_rate_limit() == 0 {
                return Err(HookguardError::ConfigError(format!(
                    "Endpoint '{}' has rate_limit = 0",
                    endpoint.name
                )));
            }
            endpoint.webhooks()?;
        }
        Ok(())
    }

    pub fn find_endpoint(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoint.iter().find(|e| e.name == name)
    }
}

/// Load and parse the configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<HookguardConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| {
        HookguardError::ConfigError(format!("Failed to read config file '{}': {}", path.display(), e))
    })?;
    HookguardConfig::from_toml_str(&content)
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATABASE_PATH)
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

pub struct AppState {
    pub config: HookguardConfig,
    pub verifiers: HashMap<String, Webhooks>,
    pub store: DeliveryStore,
    pub rate_limiter: Mutex<RateLimiter>,
    pub delivery_events: broadcast::Sender<Delivery>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: HookguardConfig, store: DeliveryStore) -> Result<Self> {
        let verifiers = config
            .endpoint
            .iter()
            .map(|e| e.webhooks().map(|w| (e.name.clone(), w)))
            .collect::<Result<HashMap<_, _>>>()?;
        let (delivery_events, _) = broadcast::channel(DELIVERY_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            verifiers,
            store,
            rate_limiter: Mutex::new(RateLimiter::new()),
            delivery_events,
            start_time: Instant::now(),
            started_at: Utc::now(),
        })
    }
}

pub type SharedState = Arc<AppState>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = HookguardConfig::from_toml_str(
            r#"
            [server]
            bind_address = "0.0.0.0:9000"

            [logging]
            level = "debug"
            directory = "logs"

            [[endpoint]]
            name = "billing"
            secret = "s3cret"
            max_clock_skew_secs = 300
            rate_limit = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.server.bind_address, "0.0.0.0:9000");
        assert_eq!(config.server.database_path, PathBuf::from(DEFAULT_DATABASE_PATH));
        assert_eq!(config.logging.directory, Some(PathBuf::from("logs")));
        assert_eq!(config.logging.get_max_files(), DEFAULT_MAX_LOG_FILES);

        let billing = config.find_endpoint("billing").unwrap();
        assert_eq!(billing.get_signature_header(), "Paddle-Signature");
        assert_eq!(billing.get_rate_limit(), 10);
        assert_eq!(billing.get_rate_limit_window(), 60);
        assert_eq!(
            billing.webhooks().unwrap().max_clock_skew(),
            Some(Duration::from_secs(300))
        );
    }

    #[test]
    fn test_defaults_for_empty_config() {
        let config = HookguardConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.logging.level, "info");
        assert!(config.endpoint.is_empty());
    }

    #[test]
    fn test_rejects_missing_secret() {
        let err = HookguardConfig::from_toml_str(
            r#"
            [[endpoint]]
            name = "billing"
            secret = ""
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, HookguardError::ConfigError(_)));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let err = HookguardConfig::from_toml_str(
            r#"
            [[endpoint]]
            name = "billing"
            secret = "a"

            [[endpoint]]
            name = "billing"
            secret = "b"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("Duplicate endpoint"));
    }

    #[test]
    fn test_rejects_zero_rate_limit() {
        let err = HookguardConfig::from_toml_str(
            r#"
            [[endpoint]]
            name = "billing"
            secret = "a"
            rate_limit = 0
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("rate_limit"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = HookguardConfig::from_toml_str("[[endpoint]\nname=").unwrap_err();
        assert!(matches!(err, HookguardError::TomlParseError(_)));
    }

    #[test]
    fn test_secret_env_fallback() {
        let endpoint = EndpointConfig {
            name: "billing".to_string(),
            secret: None,
            secret_env: Some("PATH".to_string()),
            signature_header: None,
            max_clock_skew_secs: None,
            rate_limit: None,
            rate_limit_window: None,
        };
        assert!(endpoint.resolve_secret().is_some());

        let missing = EndpointConfig {
            secret_env: Some("HOOKGUARD_TEST_UNSET_SECRET_VAR".to_string()),
            ..endpoint
        };
        assert_eq!(missing.resolve_secret(), None);
    }
}
