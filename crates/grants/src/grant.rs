use http::Method;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Level of access a grant confers.
///
/// `ReadWrite` is a superset of `Read`. There is no write-only level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Read,
    ReadWrite,
}

impl AccessLevel {
    /// The access level a request with this method needs.
    ///
    /// Safe methods (GET, HEAD, OPTIONS, TRACE) only read. Anything else,
    /// including extension methods, is treated as mutating.
    pub fn required_for(method: &Method) -> Self {
        if method.is_safe() {
            AccessLevel::Read
        } else {
            AccessLevel::ReadWrite
        }
    }

    /// Whether holding `self` is enough for an operation needing `required`.
    pub fn satisfies(self, required: AccessLevel) -> bool {
        match required {
            AccessLevel::Read => true,
            AccessLevel::ReadWrite => self == AccessLevel::ReadWrite,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessLevel::Read => f.write_str("read"),
            AccessLevel::ReadWrite => f.write_str("read_write"),
        }
    }
}

/// A single permission: an access level on every path starting with `path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathGrant {
    pub access: AccessLevel,
    pub path: String,
}

impl PathGrant {
    pub fn new(access: AccessLevel, path: impl Into<String>) -> Self {
        Self {
            access,
            path: path.into(),
        }
    }

    pub fn read(path: impl Into<String>) -> Self {
        Self::new(AccessLevel::Read, path)
    }

    pub fn read_write(path: impl Into<String>) -> Self {
        Self::new(AccessLevel::ReadWrite, path)
    }
}
