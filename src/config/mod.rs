//! Configuration management for the harvester
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file) or from a TOML file. The store host and password are the only
//! required values; everything else has a default matching the public
//! Wikipedia endpoint and the managed Redis instance the corpus lives in.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable holding the store host
pub const HOST_ENV: &str = "UPSTASH_HOST";

/// Environment variable holding the store password
pub const PASSWORD_ENV: &str = "UPSTASH_PASSWORD";

/// Port of the managed store instance
pub const DEFAULT_STORE_PORT: u16 = 40237;

/// Endpoint that redirects to a random article
pub const DEFAULT_RANDOM_URL: &str = "https://en.wikipedia.org/wiki/Special:Random";

/// Namespace for every persisted article key
pub const DEFAULT_KEY_PREFIX: &str = "trainingData:wikipedia";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Article source configuration
    pub source: SourceConfig,

    /// Key-value store configuration
    pub store: StoreConfig,

    /// Pause between iterations
    pub throttle: ThrottleConfig,

    /// Language gate configuration
    pub language: LanguageConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Where and how random articles are fetched
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL that redirects to a random article
    pub random_url: String,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Connection settings for the key-value store
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub host: String,
    pub port: u16,
    pub password: String,

    /// Connect with TLS (`rediss://`)
    pub tls: bool,

    /// Key namespace; the article title is appended after a `:`
    pub key_prefix: String,
}

/// Randomized pause applied after every iteration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Shortest pause in whole seconds (inclusive)
    pub min_pause_secs: u64,

    /// Longest pause in whole seconds (inclusive)
    pub max_pause_secs: u64,
}

/// Language gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageConfig {
    /// ISO 639-1 code an article must be detected as
    pub accepted: String,

    /// Reject detections the detector itself marks as unreliable
    pub require_reliable: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            random_url: DEFAULT_RANDOM_URL.to_string(),
            user_agent: format!(
                "wikiharvest/{} (training corpus builder)",
                env!("CARGO_PKG_VERSION")
            ),
            request_timeout_secs: 30,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_STORE_PORT,
            password: String::new(),
            tls: true,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &"<redacted>")
            .field("tls", &self.tls)
            .field("key_prefix", &self.key_prefix)
            .finish()
    }
}

impl StoreConfig {
    /// Build the connection URL understood by the redis client
    ///
    /// The password is percent-encoded; no username is sent, so the server
    /// authenticates with `AUTH <password>`.
    pub fn connection_url(&self) -> Result<String> {
        let scheme = if self.tls { "rediss" } else { "redis" };
        let mut url = Url::parse(&format!("{scheme}://{}:{}", self.host, self.port))
            .with_context(|| format!("Invalid store host: {}", self.host))?;

        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|()| anyhow::anyhow!("Cannot attach password to store URL"))?;
        }

        Ok(url.to_string())
    }

    /// `host:port` for log lines (never includes the password)
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_pause_secs: 1,
            max_pause_secs: 12,
        }
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self {
            accepted: String::from("en"),
            require_reliable: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse::<T>().ok())
}

fn credential_env(name: &str, required: bool) -> Result<String> {
    match std::env::var(name) {
        Ok(value) => Ok(value),
        Err(_) if !required => Ok(String::new()),
        Err(e) => Err(e).with_context(|| format!("Required environment variable {name} is not set")),
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// `UPSTASH_HOST` and `UPSTASH_PASSWORD` must be set.
    pub fn from_env() -> Result<Self> {
        Self::read(None, true)
    }

    /// Load configuration from a TOML file
    ///
    /// `WIKIHARVEST_*` variables override values from the file. Host and
    /// password missing from the file are taken from the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::read(Some(path), true)
    }

    /// Load from `path` when given, otherwise from the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::read(path, true)?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Load like [`Config::load`], but without requiring store credentials
    ///
    /// Used by dry runs, which never connect to the store.
    pub fn load_offline(path: Option<&Path>) -> Result<Self> {
        let config = Self::read(path, false)?;
        config.validate_harvest().context("Invalid configuration")?;
        Ok(config)
    }

    fn read(path: Option<&Path>, require_store: bool) -> Result<Self> {
        let mut config: Self = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&content).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })?
            }
            None => Self::default(),
        };

        config.apply_env_overrides();

        if config.store.host.is_empty() {
            config.store.host = credential_env(HOST_ENV, require_store)?;
        }
        if config.store.password.is_empty() {
            config.store.password = credential_env(PASSWORD_ENV, require_store)?;
        }

        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(port) = env_parse::<u16>("WIKIHARVEST_STORE_PORT") {
            self.store.port = port;
        }
        if let Some(tls) = env_parse::<bool>("WIKIHARVEST_STORE_TLS") {
            self.store.tls = tls;
        }
        if let Ok(prefix) = std::env::var("WIKIHARVEST_KEY_PREFIX") {
            self.store.key_prefix = prefix;
        }
        if let Ok(url) = std::env::var("WIKIHARVEST_RANDOM_URL") {
            self.source.random_url = url;
        }
        if let Ok(agent) = std::env::var("WIKIHARVEST_USER_AGENT") {
            self.source.user_agent = agent;
        }
        if let Some(timeout) = env_parse::<u64>("WIKIHARVEST_REQUEST_TIMEOUT") {
            self.source.request_timeout_secs = timeout;
        }
        if let Some(min) = env_parse::<u64>("WIKIHARVEST_MIN_PAUSE_SECS") {
            self.throttle.min_pause_secs = min;
        }
        if let Some(max) = env_parse::<u64>("WIKIHARVEST_MAX_PAUSE_SECS") {
            self.throttle.max_pause_secs = max;
        }
        if let Ok(level) = std::env::var("WIKIHARVEST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("WIKIHARVEST_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.store.host.trim().is_empty() {
            anyhow::bail!("store host must not be empty");
        }

        if self.store.port == 0 {
            anyhow::bail!("store port must be greater than 0");
        }

        self.validate_harvest()
    }

    /// Validate everything except the store connection settings
    fn validate_harvest(&self) -> Result<()> {
        let url = Url::parse(&self.source.random_url)
            .with_context(|| format!("Invalid random_url: {}", self.source.random_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("random_url must use http or https");
        }

        if self.source.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.throttle.min_pause_secs > self.throttle.max_pause_secs {
            anyhow::bail!(
                "min_pause_secs ({}) must not exceed max_pause_secs ({})",
                self.throttle.min_pause_secs,
                self.throttle.max_pause_secs
            );
        }

        if self.language.accepted.trim().is_empty() {
            anyhow::bail!("accepted language code must not be empty");
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            anyhow::bail!("log format must be 'text' or 'json'");
        }

        Ok(())
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.store.host = "example.upstash.io".to_string();
        config.store.password = "secret".to_string();
        config
    }

    #[test]
    fn test_default_config_needs_host() {
        assert!(Config::default().validate().is_err());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let config = Config::default();
        assert_eq!(config.store.port, 40237);
        assert!(config.store.tls);
        assert_eq!(config.store.key_prefix, "trainingData:wikipedia");
        assert_eq!(config.throttle.min_pause_secs, 1);
        assert_eq!(config.throttle.max_pause_secs, 12);
        assert_eq!(config.language.accepted, "en");
    }

    #[test]
    fn test_inverted_pause_bounds_rejected() {
        let mut config = valid_config();
        config.throttle.min_pause_secs = 10;
        config.throttle.max_pause_secs = 2;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_random_url_rejected() {
        let mut config = valid_config();
        config.source.random_url = "ftp://en.wikipedia.org/".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = valid_config();
        config.logging.format = "yaml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_connection_url_tls() {
        let config = valid_config();
        let url = config.store.connection_url().unwrap();
        assert_eq!(url, "rediss://:secret@example.upstash.io:40237");
    }

    #[test]
    fn test_connection_url_encodes_password() {
        let mut config = valid_config();
        config.store.tls = false;
        config.store.password = "p@ss/word".to_string();
        let url = config.store.connection_url().unwrap();
        assert!(url.starts_with("redis://:p%40ss%2Fword@"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = valid_config();
        let debug = format!("{:?}", config.store);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_request_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }
}
