//! Authentication extractors.
//!
//! The signed auth token travels in an HTTP-only cookie and is checked on
//! every request; the extractor loads the user document so handlers always
//! see current account state.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use chrono::Utc;

use crate::db::UserRepository;
use crate::models::User;
use crate::response::ApiMessage;
use crate::services::auth::token;
use crate::state::AppState;

/// Name of the cookie carrying the signed auth token.
pub const AUTH_COOKIE: &str = "tarini_token";

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireUser(pub User);

/// Extractor that requires a logged-in admin.
pub struct RequireAdmin(pub User);

/// Error returned when authentication fails.
pub enum AuthRejection {
    /// Missing, invalid, or expired token.
    Unauthorized,
    /// Valid user, but not an admin.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "authentication required"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "admin access required"),
        };
        (status, Json(ApiMessage::failure(message))).into_response()
    }
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = authenticate(parts, state).await?;
        if !user.is_admin {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(user))
    }
}

async fn authenticate(parts: &Parts, state: &AppState) -> Result<User, AuthRejection> {
    let header = parts
        .headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthRejection::Unauthorized)?;

    let token = cookie_value(header, AUTH_COOKIE).ok_or(AuthRejection::Unauthorized)?;

    let user_id = token::verify(
        &state.config().auth_token_secret,
        token,
        Utc::now().timestamp(),
    )
    .map_err(|_| AuthRejection::Unauthorized)?;

    UserRepository::new(state.db())
        .get_by_id(user_id)
        .await
        .ok()
        .flatten()
        .ok_or(AuthRejection::Unauthorized)
}

/// Pull a named cookie's value out of a `Cookie` header.
fn cookie_value<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// Build the `Set-Cookie` value for a fresh login.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{AUTH_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Build the `Set-Cookie` value that clears the session.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{AUTH_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value_single() {
        assert_eq!(
            cookie_value("tarini_token=abc.def", AUTH_COOKIE),
            Some("abc.def")
        );
    }

    #[test]
    fn test_cookie_value_among_others() {
        let header = "theme=dark; tarini_token=abc.def; lang=en";
        assert_eq!(cookie_value(header, AUTH_COOKIE), Some("abc.def"));
    }

    #[test]
    fn test_cookie_value_missing() {
        assert_eq!(cookie_value("theme=dark; lang=en", AUTH_COOKIE), None);
        assert_eq!(cookie_value("", AUTH_COOKIE), None);
    }

    #[test]
    fn test_cookie_value_does_not_match_prefix() {
        assert_eq!(cookie_value("tarini_token2=abc", AUTH_COOKIE), None);
    }

    #[test]
    fn test_session_cookie_flags() {
        let cookie = session_cookie("tok", 3600);
        assert!(cookie.starts_with("tarini_token=tok;"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
    }

    #[test]
    fn test_clear_session_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
