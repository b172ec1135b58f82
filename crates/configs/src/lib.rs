//! # configs
//!
//! Layered runtime settings:
//! built-in defaults → `config/default.toml` → `config/{RECLAIM_ENV}.toml` →
//! `RECLAIM__*` environment variables (after loading `.env`).
//!
//! `RECLAIM__DATABASE__URL=postgres://...` sets `database.url`.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// Postgres connection string. Absent means the in-memory store.
    pub url: Option<SecretString>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_text_len: usize,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
    pub messages: MessageSettings,
}

impl Settings {
    /// Loads settings from the default sources.
    pub fn load() -> Result<Self, ConfigError> {
        if let Err(err) = dotenvy::dotenv() {
            if !err.not_found() {
                tracing::warn!(error = %err, ".env present but unreadable");
            }
        }
        let env = std::env::var("RECLAIM_ENV").unwrap_or_else(|_| "development".into());
        Self::from_sources(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name(&format!("config/{env}")).required(false))
                .add_source(
                    Environment::with_prefix("RECLAIM")
                        .prefix_separator("__")
                        .separator("__"),
                ),
        )
    }

    /// Applies the built-in defaults underneath `builder` and validates.
    pub fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 10)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("messages.default_page_size", 50)?
            .set_default("messages.max_page_size", 100)?
            .set_default("messages.max_text_len", 2000)?
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        let m = &self.messages;
        if m.default_page_size == 0 || m.max_page_size == 0 {
            return Err(ConfigError::Invalid("page sizes must be at least 1".into()));
        }
        if m.default_page_size > m.max_page_size {
            return Err(ConfigError::Invalid(
                "messages.default_page_size exceeds messages.max_page_size".into(),
            ));
        }
        if m.max_text_len == 0 {
            return Err(ConfigError::Invalid("messages.max_text_len must be at least 1".into()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid("database.max_connections must be at least 1".into()));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
