//! Handles settings for the application.
//!
//! Settings are read from an optional `settings.toml` (another path can be
//! given with `COMMITMENTS_SETTINGS`) and then overridden by environment
//! variables such as `COMMITMENTS__DATABASE__URL`.
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

const DEFAULT_SETTINGS_PATH: &str = "settings";

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct Catalog {
    pub path: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct Database {
    /// Billing store url. When unset, evaluations fail with a configuration
    /// error.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub catalog: Catalog,
    #[serde(default)]
    pub database: Database,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let path = std::env::var("COMMITMENTS_SETTINGS")
            .unwrap_or_else(|_| DEFAULT_SETTINGS_PATH.to_string());

        defaults()?
            .add_source(File::with_name(&path).required(false))
            .add_source(Environment::with_prefix("COMMITMENTS").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}

fn defaults() -> Result<config::ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("app.level", "info")?
        .set_default("server.bind", "127.0.0.1")?
        .set_default("server.port", 8000)?
        .set_default("catalog.path", "spend_commitments.json")
}
