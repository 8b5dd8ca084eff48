//! Runtime configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ConfigError;

/// Runtime configuration for the setup service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path to the libSQL database file.
    pub db_path: PathBuf,
    /// Address the REST surface binds to.
    pub bind_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("doppio.db"),
            bind_addr: "127.0.0.1:8080".parse().expect("static default address"),
        }
    }
}

impl AppConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `DOPPIO_DB_PATH`, `DOPPIO_PORT`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("DOPPIO_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }

        if let Ok(raw) = std::env::var("DOPPIO_PORT") {
            let port: u16 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "DOPPIO_PORT".to_string(),
                message: format!("not a valid port: {raw}"),
            })?;
            config.bind_addr.set_port(port);
        }

        Ok(config)
    }
}
