//! Configuration System
//!
//! Loads the client configuration from a TOML file and applies environment
//! variable overrides on top.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ApiClientConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5555".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Where the client storage file lives
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_file_name")]
    pub file_name: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("diabetrack").to_string_lossy().to_string())
        .unwrap_or_else(|| "./diabetrack_data".to_string())
}

fn default_file_name() -> String {
    "session.json".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            file_name: default_file_name(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first readable default location, else defaults
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("diabetrack").join("config.toml")),
            Some(PathBuf::from("/etc/diabetrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!(path = ?path, "Loaded config");
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!(path = ?path, error = %e, "Failed to load config");
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply `DIABETRACK_*` overrides read through `lookup`
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DIABETRACK_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("DIABETRACK_REQUEST_TIMEOUT") {
            match timeout.parse() {
                Ok(secs) => self.api.request_timeout_secs = secs,
                Err(_) => tracing::warn!(value = %timeout, "Ignoring invalid DIABETRACK_REQUEST_TIMEOUT"),
            }
        }

        if let Some(data_dir) = lookup("DIABETRACK_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(level) = lookup("DIABETRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DIABETRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Full path of the client storage file; a leading `~` is the home directory
    pub fn session_file(&self) -> PathBuf {
        expand_home(&self.storage.data_dir).join(&self.storage.file_name)
    }

    pub fn api_client_config(&self) -> ApiClientConfig {
        ApiClientConfig {
            base_url: self.api.base_url.clone(),
            request_timeout_ms: Duration::from_secs(self.api.request_timeout_secs).as_millis() as u64,
        }
    }
}

fn expand_home(dir: &str) -> PathBuf {
    let rest = match dir.strip_prefix('~') {
        Some("") => "",
        Some(rest) if rest.starts_with('/') => &rest[1..],
        _ => return PathBuf::from(dir),
    };

    match dirs::home_dir() {
        Some(home) if rest.is_empty() => home,
        Some(home) => home.join(rest),
        None => {
            tracing::warn!(data_dir = %dir, "No home directory, using data_dir as given");
            PathBuf::from(dir)
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Diabetrack Configuration
#
# Environment variables override these settings:
# - DIABETRACK_API_URL
# - DIABETRACK_REQUEST_TIMEOUT
# - DIABETRACK_DATA_DIR
# - DIABETRACK_LOG_LEVEL
# - DIABETRACK_LOG_FORMAT

[api]
# Base URL of the diabetes API
base_url = "http://localhost:5555"

# Transport timeout in seconds
request_timeout_secs = 30

[storage]
# Directory holding the local session file
data_dir = "~/.local/share/diabetrack"

# Session file name (credential, profile, tips, checklist)
file_name = "session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty or json (written to stderr)
format = "pretty"
"#
    .to_string()
}
