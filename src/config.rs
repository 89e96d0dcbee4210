use crate::error::{SupplyMapError, SupplyMapResult};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

/// Where the graph comes from. Without a seed path the standard dataset is
/// served.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub seed_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence.
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

pub fn load_config(path: Option<&Path>) -> SupplyMapResult<AppConfig> {
    let mut builder = Config::builder().add_source(File::with_name("config").required(false));

    if let Some(path) = path {
        if !path.exists() {
            return Err(SupplyMapError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        builder = builder.add_source(File::from(path));
    }

    let config = builder
        .add_source(Environment::with_prefix("SUPPLYMAP").separator("__"))
        .build()
        .map_err(|err| SupplyMapError::ConfigError(err.to_string()))?;

    let parsed: AppConfig = config
        .try_deserialize()
        .map_err(|err| SupplyMapError::ConfigError(err.to_string()))?;

    if parsed.server.host.trim().is_empty() {
        return Err(SupplyMapError::ConfigError(
            "server.host must not be empty".to_string(),
        ));
    }

    Ok(parsed)
}
