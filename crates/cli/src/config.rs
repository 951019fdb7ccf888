//! Configuration loading from pathgate.toml.

use grants::GrantTable;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// File server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Grant table (prefix matching policy and per-user grants).
    #[serde(flatten)]
    pub grants: GrantTable,
}

/// File server configuration.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_listen")]
    pub listen: SocketAddr,

    /// Directory served behind the gate.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Header carrying the caller's user name.
    /// Only trust this behind a proxy that authenticates and sets it.
    #[serde(default = "default_user_header")]
    pub user_header: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            root: default_root(),
            user_header: default_user_header(),
        }
    }
}

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_user_header() -> String {
    "x-user".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml).map_err(|e| Error::Config(e.to_string()))?;
        config.grants.validate()?;
        Ok(config)
    }
}
