//! Capability interface consumed by the gate.

use crate::HelperError;
use grants::PathGrant;
use http::request::Parts;
use std::future::Future;

/// Operations the gate needs from its host environment.
///
/// Both take the request head. The gate calls each at most once per request,
/// grants first. If `user_grants` fails, `requested_path` is not called.
pub trait Helpers: Send + Sync + 'static {
    /// Resolve the caller's grants.
    ///
    /// Fail with [`HelperError::Authorization`] when identity cannot be
    /// established. An empty set is not an error; it means no permissions.
    fn user_grants(
        &self,
        request: &Parts,
    ) -> impl Future<Output = Result<Vec<PathGrant>, HelperError>> + Send;

    /// Resolve the canonical path being requested.
    ///
    /// Every error here is treated as internal, whatever its variant.
    fn requested_path(
        &self,
        request: &Parts,
    ) -> impl Future<Output = Result<String, HelperError>> + Send;
}
