//! HTTP middleware and extractors.

pub mod auth;

pub use auth::{AUTH_COOKIE, RequireAdmin, RequireUser, clear_session_cookie, session_cookie};
