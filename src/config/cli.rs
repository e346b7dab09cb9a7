//! Command line flags
//!
//! Flags left unset fall back to the config file and environment.

use super::{ConsumerConfig, PropagatorConfig, StorageBackend};
use crate::domain::shared::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "eventpipe-consumer", version, about = "Event Consumer")]
pub struct ConsumerArgs {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Address for the consumer API
    #[arg(long, value_name = "ADDR")]
    pub api_address: Option<String>,

    /// Port for the consumer API
    #[arg(long, value_name = "PORT")]
    pub api_port: Option<u16>,

    /// Event store backend
    #[arg(long, value_enum)]
    pub storage: Option<StorageBackend>,

    /// PostgreSQL connection URL; `DATABASE_URL` is used when neither this
    /// nor the config file sets one
    #[arg(long, value_name = "URL")]
    pub database_url: Option<String>,
}

impl ConsumerArgs {
    /// Resolve the final, validated configuration
    pub fn into_config(self) -> Result<ConsumerConfig> {
        let mut config = ConsumerConfig::load(self.config.as_deref())?;

        if let Some(host) = self.api_address {
            config.server.host = host;
        }
        if let Some(port) = self.api_port {
            config.server.port = Some(port);
        }
        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(url) = self.database_url {
            config.storage.database_url = Some(url);
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Parser, Debug, Default)]
#[command(name = "eventpipe-propagator", version, about = "Event Propagator")]
pub struct PropagatorArgs {
    /// Path to a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to event file
    #[arg(long, value_name = "FILE")]
    pub event_file: Option<PathBuf>,

    /// Consumer API address, e.g. http://127.0.0.1:5000
    #[arg(long, value_name = "URL")]
    pub api_address: Option<String>,

    /// Time between each event in seconds
    #[arg(long, value_name = "SECONDS", allow_hyphen_values = true)]
    pub period: Option<i64>,

    /// Number of concurrent delivery workers
    #[arg(long)]
    pub workers: Option<usize>,

    /// Events that may wait for a free worker before new ones are dropped
    #[arg(long)]
    pub queue_capacity: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    pub request_timeout: Option<u64>,

    /// Serve Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    pub metrics_address: Option<SocketAddr>,
}

impl PropagatorArgs {
    /// Resolve the final, validated configuration
    pub fn into_config(self) -> Result<PropagatorConfig> {
        let mut config = PropagatorConfig::load(self.config.as_deref())?;

        if let Some(path) = self.event_file {
            config.event_file = Some(path);
        }
        if let Some(url) = self.api_address {
            config.api_address = Some(url);
        }
        if let Some(period) = self.period {
            config.period = period;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(capacity) = self.queue_capacity {
            config.queue_capacity = capacity;
        }
        if let Some(timeout) = self.request_timeout {
            config.request_timeout = timeout;
        }
        if let Some(addr) = self.metrics_address {
            config.metrics_address = Some(addr);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::shared::DomainError;
    use std::io::Write;

    #[test]
    fn test_propagator_flags() {
        let args = PropagatorArgs::try_parse_from([
            "eventpipe-propagator",
            "--event-file",
            "events.json",
            "--api-address",
            "http://127.0.0.1:5000",
            "--period",
            "5",
        ])
        .unwrap();

        let config = args.into_config().unwrap();
        assert_eq!(config.period, 5);
        assert_eq!(config.event_file, Some(PathBuf::from("events.json")));
    }

    #[test]
    fn test_negative_period_is_config_error() {
        let args = PropagatorArgs::try_parse_from([
            "eventpipe-propagator",
            "--event-file",
            "events.json",
            "--api-address",
            "http://127.0.0.1:5000",
            "--period",
            "-1",
        ])
        .unwrap();

        assert!(matches!(args.into_config(), Err(DomainError::Config(_))));
    }

    #[test]
    fn test_consumer_flags() {
        let args = ConsumerArgs::try_parse_from([
            "eventpipe-consumer",
            "--api-port",
            "5000",
            "--storage",
            "memory",
        ])
        .unwrap();

        let config = args.into_config().unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:5000");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
    }

    #[test]
    fn test_file_database_url_beats_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[server]\nport = 5000\n\n[storage]\ndatabase_url = \"postgres://from-file/events\""
        )
        .unwrap();

        std::env::set_var("DATABASE_URL", "postgres://from-env/events");
        let args = ConsumerArgs::try_parse_from([
            "eventpipe-consumer",
            "--config",
            file.path().to_str().unwrap(),
        ])
        .unwrap();
        let config = args.into_config().unwrap();
        std::env::remove_var("DATABASE_URL");

        assert_eq!(
            config.storage.database_url.as_deref(),
            Some("postgres://from-file/events")
        );
    }
}
