//! Listen address configuration.
//!
//! There is no config file. The address comes from defaults, the
//! `HOST` / `PORT` environment variables, or the CLI.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Port used when none is supplied.
pub const DEFAULT_PORT: u16 = 4000;

/// Configuration for the die service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to bind the server to.
    pub bind_addr: SocketAddr,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: (Ipv4Addr::UNSPECIFIED, DEFAULT_PORT).into(),
        }
    }
}

impl ServiceConfig {
    /// Creates a config with a custom port on all interfaces.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind_addr: (Ipv4Addr::UNSPECIFIED, port).into(),
        }
    }

    /// Reads `HOST` and `PORT` from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = std::env::var("HOST").ok();
        let port = std::env::var("PORT").ok();
        Self::from_parts(host.as_deref(), port.as_deref())
    }

    /// Builds a config from optional host and port strings.
    pub fn from_parts(host: Option<&str>, port: Option<&str>) -> Result<Self, ConfigError> {
        let ip = match host.map(str::trim).filter(|h| !h.is_empty()) {
            Some(h) => h
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidHost(h.to_string()))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match port.map(str::trim).filter(|p| !p.is_empty()) {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(p.to_string()))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            bind_addr: SocketAddr::new(ip, port),
        })
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// `PORT` is not a valid port number.
    #[error("invalid port {0:?} (expected 0-65535)")]
    InvalidPort(String),
    /// `HOST` is not an IP address.
    #[error("invalid host address {0:?}")]
    InvalidHost(String),
}
