//! Short-circuit responses written by the gate.

use crate::AuthorizationError;
use axum::response::{IntoResponse, Response};
use http::StatusCode;

/// Why the gate refused to delegate a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Grant resolution failed with a classified error.
    Authorization(AuthorizationError),
    /// A helper failed or panicked.
    Internal,
    /// The grants do not cover the request.
    Denied,
}

impl Rejection {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Authorization(err) => err.status,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Denied => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Authorization(err) => &err.message,
            Self::Internal => "internal server error",
            Self::Denied => "unauthorized",
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message().to_string();
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_status_codes() {
        assert_eq!(
            Rejection::Authorization(AuthorizationError::bad_request("x")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            Rejection::Authorization(AuthorizationError::unauthorized("x")).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            Rejection::Internal.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(Rejection::Denied.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(
            Rejection::Authorization(AuthorizationError::unauthorized("user not found"))
                .message(),
            "user not found"
        );
        assert_eq!(Rejection::Internal.message(), "internal server error");
        assert_eq!(Rejection::Denied.message(), "unauthorized");
    }

    #[test]
    fn test_rejection_into_response() {
        let response = Rejection::Denied.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
