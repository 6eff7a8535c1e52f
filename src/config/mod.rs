//! Configuration management for the bridge

pub mod file;

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::{Error, Result};

use file::BridgeConfigFile;

/// Default listen port for the fulfillment server
pub const DEFAULT_PORT: u16 = 8787;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Bridge configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind
    pub host: IpAddr,

    /// Port to listen on
    pub port: u16,

    /// Overall deadline for one intent; `None` waits for every device
    pub handler_timeout: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            handler_timeout: None,
        }
    }
}

impl ServerConfig {
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Load configuration (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if a configured value cannot be parsed
    pub fn load() -> Result<Self> {
        let fc = file::load_config_file();
        Self::from_sources(&fc, |key| std::env::var(key).ok())
    }

    /// Build configuration from a config file and an environment lookup
    ///
    /// # Errors
    ///
    /// Returns error if the host, port or timeout is malformed
    pub fn from_sources(
        fc: &BridgeConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let host = env("SEA_BRIDGE_HOST")
            .or_else(|| fc.server.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host = host
            .parse::<IpAddr>()
            .map_err(|e| Error::Config(format!("invalid host {host:?}: {e}")))?;

        let port = match env("SEA_BRIDGE_PORT") {
            Some(s) => s
                .parse::<u16>()
                .map_err(|e| Error::Config(format!("invalid SEA_BRIDGE_PORT {s:?}: {e}")))?,
            None => fc.server.port.unwrap_or(DEFAULT_PORT),
        };

        let timeout_secs = match env("SEA_BRIDGE_HANDLER_TIMEOUT_SECS") {
            Some(s) => Some(s.parse::<u64>().map_err(|e| {
                Error::Config(format!("invalid SEA_BRIDGE_HANDLER_TIMEOUT_SECS {s:?}: {e}"))
            })?),
            None => fc.server.handler_timeout_secs,
        };

        Ok(Self {
            server: ServerConfig {
                host,
                port,
                // Zero disables the deadline
                handler_timeout: timeout_secs.filter(|s| *s > 0).map(Duration::from_secs),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_sources(&BridgeConfigFile::default(), env(&[])).unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "0.0.0.0:8787");
        assert!(config.server.handler_timeout.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let fc = BridgeConfigFile::parse(
            "[server]\nhost = \"127.0.0.1\"\nport = 9000\nhandler_timeout_secs = 5\n",
        )
        .unwrap();
        let config = Config::from_sources(&fc, env(&[])).unwrap();
        assert_eq!(config.server.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.server.handler_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_env_overrides_file() {
        let fc = BridgeConfigFile::parse("[server]\nport = 9000\n").unwrap();
        let config = Config::from_sources(
            &fc,
            env(&[("SEA_BRIDGE_PORT", "9100"), ("SEA_BRIDGE_HANDLER_TIMEOUT_SECS", "0")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert!(config.server.handler_timeout.is_none());
    }

    #[test]
    fn test_invalid_env_port() {
        let err = Config::from_sources(
            &BridgeConfigFile::default(),
            env(&[("SEA_BRIDGE_PORT", "eighty")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_host() {
        let err = Config::from_sources(
            &BridgeConfigFile::default(),
            env(&[("SEA_BRIDGE_HOST", "sea.local")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
