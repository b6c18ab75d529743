//! Authentication route handlers.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{ApiError, Result};
use crate::middleware::{clear_session_cookie, session_cookie};
use crate::models::User;
use crate::response::ApiMessage;
use crate::services::auth::{AuthService, token};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// Public view of an account; never carries credential material.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub is_admin: bool,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            verified: user.verified,
            is_admin: user.is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub user: UserView,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /user/auth/signup - create an account and email a verification code.
#[instrument(skip(state, form))]
pub async fn signup(
    State(state): State<AppState>,
    Json(form): Json<SignupRequest>,
) -> Result<Json<AuthResponse>> {
    if form.name.trim().is_empty() {
        return Err(ApiError::BadRequest("name is required".to_owned()));
    }

    let service = AuthService::new(state.db(), state.mail());
    let user = service
        .signup(&form.name, &form.email, &form.password)
        .await?;

    Ok(Json(AuthResponse {
        success: true,
        user: UserView::from(&user),
    }))
}

/// POST /user/auth/login - password login; sets the auth cookie.
#[instrument(skip(state, form))]
pub async fn login(
    State(state): State<AppState>,
    Json(form): Json<LoginRequest>,
) -> Result<Response> {
    let service = AuthService::new(state.db(), state.mail());
    let user = service.login(&form.email, &form.password).await?;

    Ok(issue_session(&state, &user))
}

/// POST /user/auth/logout - clear the auth cookie.
#[instrument]
pub async fn logout() -> Response {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie())]),
        Json(ApiMessage::ok("logged out")),
    )
        .into_response()
}

/// POST /user/auth/otp/verify - confirm the signup code and log in.
#[instrument(skip(state, form))]
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(form): Json<OtpRequest>,
) -> Result<Response> {
    let service = AuthService::new(state.db(), state.mail());
    let user = service.verify_otp(&form.email, &form.code).await?;

    Ok(issue_session(&state, &user))
}

/// POST /user/auth/otp/resend - regenerate and re-email the signup code.
#[instrument(skip(state, form))]
pub async fn resend_otp(
    State(state): State<AppState>,
    Json(form): Json<EmailRequest>,
) -> Result<Json<ApiMessage>> {
    let service = AuthService::new(state.db(), state.mail());
    service.resend_otp(&form.email).await?;

    Ok(Json(ApiMessage::ok("verification code sent")))
}

/// POST /user/auth/password/forgot - email a reset code.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(form): Json<EmailRequest>,
) -> Result<Json<ApiMessage>> {
    let service = AuthService::new(state.db(), state.mail());
    service.forgot_password(&form.email).await?;

    Ok(Json(ApiMessage::ok("password reset code sent")))
}

/// POST /user/auth/password/reset - set a new password with the reset code.
#[instrument(skip(state, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(form): Json<ResetPasswordRequest>,
) -> Result<Json<ApiMessage>> {
    let service = AuthService::new(state.db(), state.mail());
    service
        .reset_password(&form.email, &form.code, &form.new_password)
        .await?;

    Ok(Json(ApiMessage::ok("password updated")))
}

/// Sign a token for `user` and attach it as an HTTP-only cookie.
fn issue_session(state: &AppState, user: &User) -> Response {
    let config = state.config();
    let ttl_secs = config.token_ttl_hours * 3600;
    let expires_at = chrono::Utc::now().timestamp() + ttl_secs;
    let token = token::sign(&config.auth_token_secret, user.id, expires_at);

    (
        AppendHeaders([(SET_COOKIE, session_cookie(&token, ttl_secs))]),
        Json(AuthResponse {
            success: true,
            user: UserView::from(user),
        }),
    )
        .into_response()
}
