//! Service configuration loaded from the environment

use crate::error::{StoreError, StoreResult};
use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Storefront service configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface to bind (e.g., "0.0.0.0")
    pub host: String,

    /// TCP port to listen on
    pub port: u16,

    /// Default log level when `RUST_LOG` is unset
    pub log_level: String,

    /// Optional JSON catalog replacing the bundled one
    pub catalog_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> StoreResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let port = match env::var("STOREFRONT_PORT") {
            Ok(raw) => raw.trim().parse::<u16>().map_err(|e| {
                StoreError::Config(format!("Invalid STOREFRONT_PORT '{}': {}", raw, e))
            })?,
            Err(_) => 8000,
        };

        Ok(Config {
            host: env::var("STOREFRONT_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            catalog_path: env::var("CATALOG_PATH").ok().map(PathBuf::from),
        })
    }

    /// Socket address built from `host` and `port`
    pub fn bind_addr(&self) -> StoreResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| StoreError::Config(format!("Invalid bind address: {}", e)))
    }

    /// Initialize tracing; `RUST_LOG` takes precedence over `log_level`
    pub fn init_logging(&self) -> StoreResult<()> {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(format!("storefront_rust={}", self.log_level)))
            .map_err(|e| StoreError::Config(format!("Invalid log level: {}", e)))?;

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .map_err(|e| StoreError::Config(format!("Failed to install subscriber: {}", e)))?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            catalog_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bind_addr() {
        let config = Config::default();
        let addr = config.bind_addr().unwrap();
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_bad_host_is_config_error() {
        let config = Config {
            host: "not a host".into(),
            ..Config::default()
        };
        assert!(matches!(config.bind_addr(), Err(StoreError::Config(_))));
    }
}
