//! Header-based helpers backed by a static grant table.

use gate::{AuthorizationError, HelperError, Helpers};
use grants::{GrantTable, PathGrant};
use http::HeaderName;
use http::request::Parts;

/// Resolves the caller from a trusted header and their grants from a
/// [`GrantTable`]. The requested path is the URI path.
pub struct HeaderHelpers {
    table: GrantTable,
    header: HeaderName,
}

impl HeaderHelpers {
    pub fn new(table: GrantTable, header: HeaderName) -> Self {
        Self { table, header }
    }
}

impl Helpers for HeaderHelpers {
    async fn user_grants(&self, request: &Parts) -> Result<Vec<PathGrant>, HelperError> {
        let header = &self.header;
        let user = request
            .headers
            .get(header)
            .ok_or_else(|| AuthorizationError::bad_request(format!("missing {header} header")))?
            .to_str()
            .map_err(|_| AuthorizationError::bad_request(format!("invalid {header} header")))?;

        let grants = self
            .table
            .grants_for(user)
            .ok_or_else(|| AuthorizationError::unauthorized("user not found"))?;

        Ok(grants.to_vec())
    }

    async fn requested_path(&self, request: &Parts) -> Result<String, HelperError> {
        canonical_path(request.uri.path()).map(str::to_string)
    }
}

/// Reject paths with `.` or `..` segments, including percent-encoded dots.
/// Grants are plain prefixes, so such paths could escape a granted directory.
fn canonical_path(path: &str) -> Result<&str, HelperError> {
    let dotted = path.split('/').any(|segment| {
        let decoded = segment.replace("%2e", ".").replace("%2E", ".");
        decoded == "." || decoded == ".."
    });

    if dotted {
        return Err(HelperError::internal(format!("non-canonical path: {path}")));
    }
    Ok(path)
}
