//! Request-time authorization gate for path-scoped resources.
//!
//! The gate wraps a downstream service (typically a file server) and decides,
//! per request, whether the caller may touch the requested path with the
//! semantics of the HTTP method. It owns only the decision: who the caller is
//! and what path they want come from a [`Helpers`] implementation injected at
//! construction.
//!
//! # Request flow
//!
//! 1. [`Helpers::user_grants`] resolves the caller's grants. An
//!    [`AuthorizationError`] is returned to the caller verbatim; any other
//!    failure becomes a 500.
//! 2. [`Helpers::requested_path`] resolves the path. Any failure becomes a 500.
//! 3. The grants are evaluated. A denial becomes a 401; an allow hands the
//!    untouched request to the inner service.
//!
//! # Example
//!
//! ```no_run
//! use axum::{Router, routing::any};
//! use gate::{HelperError, Helpers, file_permissions};
//! use grants::PathGrant;
//! use http::request::Parts;
//!
//! struct Everyone;
//!
//! impl Helpers for Everyone {
//!     async fn user_grants(&self, _: &Parts) -> Result<Vec<PathGrant>, HelperError> {
//!         Ok(vec![PathGrant::read("/public/")])
//!     }
//!
//!     async fn requested_path(&self, request: &Parts) -> Result<String, HelperError> {
//!         Ok(request.uri.path().to_string())
//!     }
//! }
//!
//! let app: Router = Router::new()
//!     .route("/{*path}", any(|| async { "ok" }))
//!     .layer(file_permissions(Everyone));
//! ```

mod error;
mod helpers;
mod middleware;
mod rejection;

pub use error::{AuthorizationError, BoxError, HelperError};
pub use helpers::Helpers;
pub use middleware::{FilePermissions, FilePermissionsLayer, file_permissions};
pub use rejection::Rejection;
