//! Unified error handling with Sentry integration.
//!
//! Provides a unified `ApiError` type that captures server errors to Sentry
//! before responding. All route handlers return `Result<T, ApiError>`; the
//! response body is always the `{ success: false, message }` envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::response::ApiMessage;
use crate::services::auth::AuthError;
use crate::services::email::EmailError;
use crate::services::payment::PaymentError;

/// Application-level error type for the API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Payment gateway operation failed.
    #[error("payment error: {0}")]
    Payment(#[from] PaymentError),

    /// Email delivery failed.
    #[error("email error: {0}")]
    Email(#[from] EmailError),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if is_server_error(&self) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserNotFound => StatusCode::NOT_FOUND,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidOtp => StatusCode::BAD_REQUEST,
                AuthError::NotVerified => StatusCode::FORBIDDEN,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            // Gateway failures propagate as generic 500s; there is no retry.
            Self::Payment(_) | Self::Email(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "not found".to_owned(),
                RepositoryError::Conflict(msg) => msg.clone(),
                _ => "internal server error".to_owned(),
            },
            Self::Auth(err) => match err {
                AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Mail(_) => {
                    "internal server error".to_owned()
                }
                other => other.to_string(),
            },
            Self::Payment(_) => "payment gateway error".to_owned(),
            Self::Email(_) | Self::Internal(_) => "internal server error".to_owned(),
            Self::NotFound(msg)
            | Self::Unauthorized(msg)
            | Self::BadRequest(msg) => msg.clone(),
        };

        (status, Json(ApiMessage::failure(message))).into_response()
    }
}

/// Whether the error should page someone rather than blame the client.
fn is_server_error(err: &ApiError) -> bool {
    match err {
        ApiError::Database(repo) => !matches!(
            repo,
            RepositoryError::NotFound | RepositoryError::Conflict(_)
        ),
        ApiError::Auth(auth) => matches!(
            auth,
            AuthError::Repository(_) | AuthError::PasswordHash | AuthError::Mail(_)
        ),
        ApiError::Payment(_) | ApiError::Email(_) | ApiError::Internal(_) => true,
        _ => false,
    }
}

/// Result type alias for `ApiError`.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_of(ApiError::NotFound("x".to_owned())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Unauthorized("x".to_owned())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::BadRequest("x".to_owned())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Internal("x".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_variants_map_to_client_statuses() {
        assert_eq!(
            status_of(ApiError::Database(RepositoryError::NotFound)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ApiError::Database(RepositoryError::Conflict(
                "product already in cart".to_owned()
            ))),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_auth_variants() {
        assert_eq!(
            status_of(ApiError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::UserAlreadyExists)),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::InvalidOtp)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ApiError::Auth(AuthError::NotVerified)),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_gateway_errors_are_masked_500s() {
        let err = ApiError::Payment(crate::services::payment::PaymentError::Gateway {
            status: 401,
            message: "bad key".to_owned(),
        });
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
