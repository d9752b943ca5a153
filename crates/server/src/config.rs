//! Layered application configuration.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `/etc/restful-sample/config.toml`
//! 3. `./config/config.toml`
//! 4. `./config.toml`
//! 5. An explicit `--config <path>`, when given
//! 6. Environment variables such as `SERVER_PORT` or `DATABASE_DSN`

#![allow(clippy::result_large_err)]

use std::path::Path;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "restful-sample";

/// Top-level sections; also the set of env var prefixes that are honoured.
const SECTIONS: [&str; 5] = ["server", "log", "database", "swagger", "metrics"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
    pub database: DatabaseConfig,
    pub swagger: SwaggerConfig,
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request budget for store calls.
    pub request_timeout_secs: u64,
    /// How long shutdown waits for in-flight requests and pool close.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            shutdown_grace_secs: 10,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Console,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub level: String,
    pub format: LogFormat,
    pub color: bool,
    /// Request paths excluded from the access log.
    pub skip_paths: Vec<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Console,
            color: true,
            skip_paths: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub dsn: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            dsn: format!("sqlite://{APP_NAME}.db?mode=rwc"),
            max_connections: 30,
            min_connections: 3,
            acquire_timeout_secs: 5,
            max_lifetime_secs: 60,
        }
    }
}

impl DatabaseConfig {
    /// A private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        Self {
            dsn: "sqlite::memory:".to_string(),
            ..Self::default()
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.dsn.contains(":memory:") || self.dsn.contains("mode=memory")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwaggerConfig {
    pub enabled: bool,
    /// Advertised as the OpenAPI `servers` entry.
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Values from the command line that win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub log_color: Option<bool>,
}

impl AppConfig {
    pub fn apply(&mut self, overrides: Overrides) {
        if let Some(level) = overrides.log_level {
            self.log.level = level;
        }
        if let Some(format) = overrides.log_format {
            self.log.format = format;
        }
        if let Some(color) = overrides.log_color {
            self.log.color = color;
        }
    }
}

/// Load `.env`, then extract the layered configuration.
pub fn load(explicit: Option<&Path>) -> Result<AppConfig, figment::Error> {
    let _ = dotenvy::dotenv();
    build_figment(explicit).extract()
}

/// Parse a TOML string over the compiled defaults, without files or env.
pub fn load_from_str(toml_content: &str) -> Result<AppConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// The figment before extraction.
pub fn build_figment(explicit: Option<&Path>) -> Figment {
    let mut figment = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(format!("/etc/{APP_NAME}/config.toml")))
        .merge(Toml::file("config/config.toml"))
        .merge(Toml::file("config.toml"));
    if let Some(path) = explicit {
        figment = figment.merge(Toml::file(path));
    }
    figment.merge(env_provider())
}

/// Unprefixed env vars, restricted to known sections. Only the first `_`
/// after the section name becomes a `.`, so `SERVER_REQUEST_TIMEOUT_SECS`
/// maps to `server.request_timeout_secs`.
fn env_provider() -> Env {
    Env::raw().filter_map(|key| env_key(key.as_str()).map(Into::into))
}

fn env_key(raw: &str) -> Option<String> {
    let key = raw.to_ascii_lowercase();
    SECTIONS.iter().find_map(|section| {
        key.strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'))
            .filter(|rest| !rest.is_empty())
            .map(|rest| format!("{section}.{rest}"))
    })
}
