//! Configuration types and loading.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Chat service connection details.
    pub server: ServerConfig,
    /// Credentials and presentation.
    pub identity: IdentityConfig,
    /// Rooms to join on every connection, in order. Rooms from persisted
    /// settings are appended after these.
    #[serde(default)]
    pub rooms: Vec<String>,
    /// Delay between queued room joins, in milliseconds.
    #[serde(default = "default_join_pacing_ms")]
    pub join_pacing_ms: u64,
    /// Path of the persisted settings store.
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

/// Chat service endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Service hostname.
    pub host: String,
    /// Service port (default: 443).
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect over TLS (default: true).
    #[serde(default = "default_tls")]
    pub tls: bool,
    /// WebSocket endpoint path (default: "/showdown/websocket").
    #[serde(default = "default_ws_path")]
    pub path: String,
    /// Login endpoint for the credential exchange.
    pub login_url: String,
}

/// Credentials and presentation.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Username to claim after login.
    pub username: String,
    /// Password for the credential exchange.
    pub password: String,
    /// Avatar number to set after login.
    #[serde(default = "default_avatar")]
    pub avatar: u32,
}

fn default_port() -> u16 {
    443
}

fn default_tls() -> bool {
    true
}

fn default_ws_path() -> String {
    "/showdown/websocket".to_owned()
}

fn default_avatar() -> u32 {
    1
}

fn default_join_pacing_ms() -> u64 {
    500
}

fn default_settings_path() -> String {
    "settings.json".to_owned()
}
