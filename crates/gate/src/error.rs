//! Errors surfaced by [`Helpers`](crate::Helpers) implementations.

use http::StatusCode;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A classified failure whose status and message are shown to the caller.
///
/// Raised when the caller's identity or grants cannot be established, e.g.
/// an unauthenticated or malformed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} ({status})")]
pub struct AuthorizationError {
    pub status: StatusCode,
    pub message: String,
}

impl AuthorizationError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

/// Failure returned by a helper operation.
#[derive(Debug, Error)]
pub enum HelperError {
    /// Shown to the caller with its own status.
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    /// Anything else. The cause is logged, never sent.
    #[error("internal error: {0}")]
    Internal(#[source] BoxError),
}

impl HelperError {
    pub fn internal(cause: impl Into<BoxError>) -> Self {
        Self::Internal(cause.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_error_display() {
        let err = AuthorizationError::unauthorized("user not found");
        assert_eq!(err.to_string(), "user not found (401 Unauthorized)");
    }

    #[test]
    fn test_helper_error_from_authorization() {
        let err: HelperError = AuthorizationError::bad_request("bad").into();
        assert!(matches!(
            err,
            HelperError::Authorization(AuthorizationError { status, .. }) if status == StatusCode::BAD_REQUEST
        ));
    }

    #[test]
    fn test_internal_from_io_error() {
        let err = HelperError::internal(std::io::Error::other("storage unavailable"));
        assert_eq!(err.to_string(), "internal error: storage unavailable");
    }
}
