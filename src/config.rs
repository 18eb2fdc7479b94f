//! Configuration module for godw.
//!
//! The configuration is read once at start-up from a TOML file (`godw.conf`
//! by default) and handed to each component by value. Unknown keys are
//! ignored and every key has a default.
//!
//! ```toml
//! size = 1073741824
//! admin = "admin"
//!
//! [server]
//! port = 8080
//!
//! [store]
//! root = "files"
//! ```

use serde::{Deserialize, Deserializer};
use std::path::Path;

use crate::{GodwError, Result};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "godw.conf";

/// Default maximum upload size (1 GiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 1024 * 1024 * 1024;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timezone for displaying modification times (e.g., "Asia/Tokyo", "UTC").
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timezone: default_timezone(),
        }
    }
}

/// File store configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the uploaded files.
    #[serde(default = "default_store_root")]
    pub root: String,
    /// Directory the static asset mounts are served from.
    #[serde(default = "default_template_path")]
    pub template_path: String,
}

fn default_store_root() -> String {
    "files".to_string()
}

fn default_template_path() -> String {
    "template".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: default_store_root(),
            template_path: default_template_path(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/godw.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Maximum upload size in bytes. Accepts an integer or a float.
    #[serde(default = "default_size", deserialize_with = "deserialize_size")]
    pub size: u64,
    /// Admin identity; a request carrying this key as a query parameter or
    /// session cookie value is granted admin capability.
    #[serde(default = "default_admin")]
    pub admin: String,
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// File store configuration.
    #[serde(default)]
    pub store: StoreConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_size() -> u64 {
    DEFAULT_MAX_UPLOAD_BYTES
}

fn default_admin() -> String {
    "admin".to_string()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SizeValue {
    Int(i64),
    Float(f64),
}

fn deserialize_size<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match SizeValue::deserialize(deserializer)? {
        SizeValue::Int(n) if n > 0 => Ok(n as u64),
        SizeValue::Float(f) if f.is_finite() && f >= 1.0 => Ok(f as u64),
        SizeValue::Int(n) => Err(D::Error::custom(format!(
            "size must be positive, got {n}"
        ))),
        SizeValue::Float(f) => Err(D::Error::custom(format!(
            "size must be positive, got {f}"
        ))),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: default_size(),
            admin: default_admin(),
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GodwError::Config(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| GodwError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.admin.trim().is_empty() {
            return Err(GodwError::Config("admin identity must not be blank".into()));
        }
        Ok(())
    }
}
