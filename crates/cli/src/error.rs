//! CLI error types.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// CLI errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The config file does not exist.
    #[error("config not found at {path}. Pass --config or create pathgate.toml")]
    ConfigNotFound { path: PathBuf },

    /// Configuration is invalid or missing required fields.
    #[error("config error: {0}")]
    Config(String),

    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// The `--method` argument is not a valid HTTP method.
    #[error("invalid method '{0}'")]
    InvalidMethod(String),

    /// An error occurred loading the grant table.
    #[error(transparent)]
    Grants(#[from] grants::Error),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
