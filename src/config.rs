//! Server settings resolved from CLI flags and `ADVISOR_*` environment variables.

use std::net::{IpAddr, SocketAddr};

use clap::ValueEnum;
use thiserror::Error;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid listen host `{0}`")]
    InvalidHost(String),
    #[error("port must be non-zero")]
    InvalidPort,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::InvalidPort);
        }
        let ip = match self.host.as_str() {
            "localhost" => IpAddr::from([127, 0, 0, 1]),
            host => host
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?,
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_format: LogFormat::Text,
        }
    }
}
