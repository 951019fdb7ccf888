//! Grant table error types.

use thiserror::Error;

/// Grant table errors.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The grant table is structurally valid TOML but violates a rule.
    #[error("invalid grant table: {0}")]
    Invalid(String),

    /// Failed to parse a grant table file.
    #[error("failed to parse grant table: {0}")]
    Parse(String),

    /// An I/O error occurred while reading the grant table.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
