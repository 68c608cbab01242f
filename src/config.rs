//! Runtime configuration

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while interpreting configuration values
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid listen address '{host}': {reason}")]
    InvalidAddress { host: String, reason: String },
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Interface the HTTP server binds to.
    #[arg(long, env, default_value = "127.0.0.1")]
    pub host: String,

    /// Port the HTTP server listens on.
    #[arg(short, long, env, default_value_t = 3030)]
    pub port: u16,

    /// Milliseconds between two greetings on a stream.
    #[arg(long, env, default_value_t = 1000,
        value_parser = clap::value_parser!(u64).range(1..))]
    pub emit_interval_ms: u64,

    /// Replace the stored users with the sample users on startup.
    #[arg(long, env = "SEED_USERS", default_value_t = true, action = clap::ArgAction::Set)]
    pub seed: bool,

    /// Default tracing filter, overridden by RUST_LOG.
    #[arg(long, env, default_value = "info")]
    pub log_filter: String,
}

impl Config {
    /// Load `.env` if present, then parse flags and environment
    pub fn new() -> Self {
        dotenvy::dotenv().ok();
        Config::parse()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddress {
                host: self.host.clone(),
                reason: e.to_string(),
            })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn emit_interval(&self) -> Duration {
        Duration::from_millis(self.emit_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3030,
            emit_interval_ms: 1000,
            seed: true,
            log_filter: "info".to_string(),
        }
    }
}
