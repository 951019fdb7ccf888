//! Static grant table loaded from TOML.

use crate::{Error, Evaluator, PathGrant, PrefixMatch, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-user grants keyed by user name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GrantTable {
    /// Prefix matching policy applied to every grant in the table.
    #[serde(default)]
    pub prefix_match: PrefixMatch,

    /// Grants for each known user.
    #[serde(default)]
    pub users: HashMap<String, UserGrants>,
}

/// Grants held by one user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserGrants {
    #[serde(default)]
    pub grants: Vec<PathGrant>,
}

impl GrantTable {
    /// Load a grant table from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse a grant table from a TOML string.
    pub fn parse(toml: &str) -> Result<Self> {
        let table: Self = toml::from_str(toml).map_err(|e| Error::Parse(e.to_string()))?;
        table.validate()?;
        Ok(table)
    }

    /// Check that every grant path is absolute.
    ///
    /// Called by [`GrantTable::parse`]; call it directly when the table is
    /// embedded in a larger config.
    pub fn validate(&self) -> Result<()> {
        for (user, entry) in &self.users {
            for grant in &entry.grants {
                if !grant.path.starts_with('/') {
                    return Err(Error::Invalid(format!(
                        "grant path '{}' for user '{}' must start with '/'",
                        grant.path, user
                    )));
                }
            }
        }
        Ok(())
    }

    /// Grants for `user`, or `None` if the user is not in the table.
    ///
    /// A known user with no grants yields an empty slice.
    pub fn grants_for(&self, user: &str) -> Option<&[PathGrant]> {
        self.users.get(user).map(|u| u.grants.as_slice())
    }

    /// Evaluator configured with this table's matching policy.
    pub fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.prefix_match)
    }
}
