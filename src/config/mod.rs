//! Configuration management
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! `EVENTPIPE_*` environment variables, then command line flags.

pub mod cli;

use crate::domain::shared::{DomainError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub use cli::{ConsumerArgs, PropagatorArgs};

/// Consumer service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Postgres,
            database_url: None,
            max_connections: 10,
        }
    }
}

impl ConsumerConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_layered(path, "EVENTPIPE_CONSUMER")
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port.is_none() {
            return Err(DomainError::Config("api port is required".to_string()));
        }
        if self.storage.max_connections == 0 {
            return Err(DomainError::Config(
                "max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Listen address; call after [`ConsumerConfig::validate`]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port.unwrap_or_default())
    }
}

/// Propagator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagatorConfig {
    pub event_file: Option<PathBuf>,
    /// Base URL of the consumer service
    pub api_address: Option<String>,
    /// Seconds between selections
    pub period: i64,
    pub workers: usize,
    pub queue_capacity: usize,
    /// Per-request timeout in seconds
    pub request_timeout: u64,
    pub metrics_address: Option<SocketAddr>,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            event_file: None,
            api_address: None,
            period: 3,
            workers: 4,
            queue_capacity: 64,
            request_timeout: 30,
            metrics_address: None,
        }
    }
}

impl PropagatorConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        load_layered(path, "EVENTPIPE_PROPAGATOR")
    }

    pub fn validate(&self) -> Result<()> {
        if self.event_file.is_none() {
            return Err(DomainError::Config("event file is required".to_string()));
        }
        match self.api_address.as_deref() {
            None => return Err(DomainError::Config("api address is required".to_string())),
            Some(url) => {
                crate::infrastructure::dispatch::event_endpoint(url)?;
            }
        }
        if self.period < 1 {
            return Err(DomainError::Config(
                "period must be a positive integer".to_string(),
            ));
        }
        if self.workers == 0 {
            return Err(DomainError::Config("workers must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(DomainError::Config(
                "queue capacity must be at least 1".to_string(),
            ));
        }
        if self.request_timeout == 0 {
            return Err(DomainError::Config(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        Ok(())
    }

    pub fn period_duration(&self) -> Duration {
        Duration::from_secs(self.period.max(0) as u64)
    }

    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn load_layered<T>(path: Option<&Path>, env_prefix: &str) -> Result<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    let defaults = config::Config::try_from(&T::default())
        .map_err(|e| DomainError::Config(format!("invalid defaults: {}", e)))?;

    let mut builder = config::Config::builder().add_source(defaults);

    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path).required(true));
    }

    builder = builder.add_source(
        config::Environment::with_prefix(env_prefix)
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .and_then(|settings| settings.try_deserialize())
        .map_err(|e| DomainError::Config(format!("failed to load configuration: {}", e)))
}
