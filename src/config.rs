//! Runtime configuration
//!
//! Defaults target the public Wikidata query service. A YAML file can
//! override any field, and a few environment variables override the file.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const ENV_SPARQL_ENDPOINT: &str = "CITY_BUDDIES_SPARQL_ENDPOINT";
pub const ENV_ADDRESS: &str = "CITY_BUDDIES_ADDRESS";
pub const ENV_PORT: &str = "CITY_BUDDIES_PORT";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {name}: {value}")]
    InvalidEnv { name: &'static str, value: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Where and how SPARQL queries are sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Wikibase instance the entities belong to
    pub instance: String,
    /// SPARQL endpoint URL
    pub sparql_endpoint: String,
    /// Language used by the label service
    pub language: String,
    /// User-Agent sent with every request
    pub user_agent: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            instance: "https://www.wikidata.org".to_string(),
            sparql_endpoint: "https://query.wikidata.org/sparql".to_string(),
            language: "en".to_string(),
            user_agent: format!("city-buddies/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// HTTP API listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub address: String,
    /// Port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub server: ServerConfig,
}

impl AppConfig {
    /// Parse a YAML document; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Load `path` if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENV_SPARQL_ENDPOINT) {
            self.service.sparql_endpoint = endpoint;
        }
        if let Some(address) = lookup(ENV_ADDRESS) {
            self.server.address = address;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port.parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_PORT,
                value: port.clone(),
            })?;
        }
        Ok(())
    }
}
