//! Handles settings for the application.
//!
//! Values are read from `config/settings.toml` (optional) and overridden by
//! `FUNDBOOK__*` environment variables, e.g. `FUNDBOOK__SERVER__PORT=8080`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    /// Level passed to the tracing env filter.
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    pub database: Database,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_hours: i64,
}

fn default_port() -> u16 {
    3000
}

fn default_session_ttl() -> i64 {
    24 * 7
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub server: Option<Server>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/settings").required(false))
            .add_source(Environment::with_prefix("FUNDBOOK").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}
