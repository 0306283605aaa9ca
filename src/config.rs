//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

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

/// Microservice endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Gateway URL every service is reached through unless overridden
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub services: ServiceUrls,
}

/// Per-service base URL overrides
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceUrls {
    pub iam: Option<String>,
    pub residents: Option<String>,
    pub appointments: Option<String>,
    pub payments: Option<String>,
    pub notifications: Option<String>,
    pub food: Option<String>,
    pub users: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080/api/v1".to_string()
}

fn default_timeout_ms() -> u64 {
    15_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_ms: default_timeout_ms(),
            services: ServiceUrls::default(),
        }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding the session and cache file
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("carehub").to_string_lossy().to_string())
        .unwrap_or_else(|| "./carehub_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Data directory with a leading `~/` expanded to the home directory
    pub fn resolved_dir(&self) -> PathBuf {
        match self.data_dir.strip_prefix("~/") {
            Some(rest) => dirs::home_dir()
                .map(|home| home.join(rest))
                .unwrap_or_else(|| PathBuf::from(&self.data_dir)),
            None => PathBuf::from(&self.data_dir),
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

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
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

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let (config, skipped) = Self::load_default_reporting();
        for e in &skipped {
            tracing::warn!("Skipped config file: {}", e);
        }
        config
    }

    /// Like [`Config::load_default`], also returning the files that exist
    /// but could not be loaded, for callers that run before logging is up
    pub fn load_default_reporting() -> (Self, Vec<ConfigError>) {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("carehub").join("config.toml")),
            Some(PathBuf::from("/etc/carehub/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];
        Self::load_first(config_paths.iter().flatten())
    }

    fn load_first<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> (Self, Vec<ConfigError>) {
        let mut skipped = Vec::new();
        for path in paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return (config, skipped);
                    }
                    Err(e) => skipped.push(e),
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        (Self::from_env(), skipped)
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = lookup("CAREHUB_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = lookup("CAREHUB_API_TIMEOUT_MS") {
            if let Ok(ms) = timeout.parse() {
                self.api.timeout_ms = ms;
            }
        }

        let services = &mut self.api.services;
        for (key, slot) in [
            ("CAREHUB_IAM_URL", &mut services.iam),
            ("CAREHUB_RESIDENTS_URL", &mut services.residents),
            ("CAREHUB_APPOINTMENTS_URL", &mut services.appointments),
            ("CAREHUB_PAYMENTS_URL", &mut services.payments),
            ("CAREHUB_NOTIFICATIONS_URL", &mut services.notifications),
            ("CAREHUB_FOOD_URL", &mut services.food),
            ("CAREHUB_USERS_URL", &mut services.users),
        ] {
            if let Some(url) = lookup(key) {
                *slot = Some(url);
            }
        }

        // Storage overrides
        if let Some(data_dir) = lookup("CAREHUB_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        // Logging overrides
        if let Some(level) = lookup("CAREHUB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("CAREHUB_LOG_FORMAT") {
            self.logging.format = format;
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
    r#"# Carehub Configuration
#
# Environment variables override these settings:
# - CAREHUB_API_URL
# - CAREHUB_API_TIMEOUT_MS
# - CAREHUB_<SERVICE>_URL (IAM, RESIDENTS, APPOINTMENTS, PAYMENTS,
#   NOTIFICATIONS, FOOD, USERS)
# - CAREHUB_DATA_DIR
# - CAREHUB_LOG_LEVEL
# - CAREHUB_LOG_FORMAT

[api]
# Gateway every microservice is reached through
base_url = "http://localhost:8080/api/v1"

# Request timeout in milliseconds
timeout_ms = 15000

# Per-service overrides when a service is not behind the gateway
[api.services]
# iam = "http://localhost:8080/api/v1"
# residents = "http://localhost:8081/api/v1"
# payments = "http://localhost:8082/api/v1"
# users = "http://localhost:8083/api/v1"
# notifications = "http://localhost:8084/api/v1"
# appointments = "http://localhost:8085/api/v1"
# food = "http://localhost:8086/api/v1"

[storage]
# Directory for the session and local cache file
data_dir = "~/.local/share/carehub"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path
# file = "/var/log/carehub/carehub.log"
"#
    .to_string()
}
