//! Server configuration.
//!
//! A TOML file sets the defaults; environment variables override
//! individual fields so deployments can keep the token out of the file.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable overriding the bind address.
pub const ENV_ADDR: &str = "ROSTRA_API_ADDR";
/// Environment variable overriding the write-back token.
pub const ENV_TOKEN: &str = "ROSTRA_API_TOKEN";
/// Environment variable overriding the snapshot document path.
pub const ENV_DATA_PATH: &str = "ROSTRA_DATA_PATH";

/// Write-back endpoint configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the server binds to.
    #[serde(default = "default_addr")]
    pub addr: SocketAddr,

    /// Token the `POST /data` bearer token is compared against.
    pub token: String,

    /// Path of the snapshot document served and overwritten.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
}

fn default_addr() -> SocketAddr {
    ([127, 0, 0, 1], 8320).into()
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data.json")
}

impl Config {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("read {}: {e}", path.display())))?;
        toml::from_str(&raw).map_err(|e| Error::Config(format!("parse {}: {e}", path.display())))
    }

    /// Build a config from environment variables alone. The token is
    /// required; the rest fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(ENV_TOKEN)
            .map_err(|_| Error::Config(format!("{ENV_TOKEN} must be set")))?;
        Ok(Self {
            addr: default_addr(),
            token,
            data_path: default_data_path(),
        }
        .with_env_overrides()?)
    }

    /// Apply environment overrides on top of whatever the file said.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(addr) = std::env::var(ENV_ADDR) {
            self.addr = addr
                .parse()
                .map_err(|e| Error::Config(format!("{ENV_ADDR}: {e}")))?;
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            self.token = token;
        }
        if let Ok(path) = std::env::var(ENV_DATA_PATH) {
            self.data_path = PathBuf::from(path);
        }
        Ok(self)
    }
}
