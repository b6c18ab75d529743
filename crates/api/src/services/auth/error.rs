//! Authentication error type.

use thiserror::Error;

use tarini_core::EmailError;

use crate::db::RepositoryError;
use crate::services::email::EmailError as MailError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email/password combination is wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account for the given email.
    #[error("user not found")]
    UserNotFound,

    /// Signup attempted with an email that already has an account.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// Password fails the policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// Email address failed validation.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Login attempted before the emailed code was confirmed.
    #[error("account is not verified")]
    NotVerified,

    /// One-time code is wrong, expired, or for a different purpose.
    #[error("invalid or expired code")]
    InvalidOtp,

    /// Argon2 hashing failed.
    #[error("password hashing failed")]
    PasswordHash,

    /// Database operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// The code could not be emailed.
    #[error("email delivery failed: {0}")]
    Mail(#[from] MailError),
}
