//! Authentication service.
//!
//! Signup with emailed one-time codes, password login, and password reset.

mod error;
pub mod token;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use bson::DateTime;
use chrono::{Duration, Utc};
use mongodb::Database;

use tarini_core::{Email, UserId};

use crate::db::{RepositoryError, users::UserRepository};
use crate::models::user::{OtpChallenge, OtpPurpose, User};
use crate::services::email::{EmailService, generate_otp};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long an emailed code stays valid.
const OTP_TTL_MINUTES: i64 = 10;

/// Authentication service.
///
/// Owns the account lifecycle: registration, email verification, login, and
/// password reset.
pub struct AuthService<'a> {
    users: UserRepository,
    mail: &'a EmailService,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub fn new(db: &Database, mail: &'a EmailService) -> Self {
        Self {
            users: UserRepository::new(db),
            mail,
        }
    }

    /// Register a new account and email it a verification code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        let otp = new_challenge(OtpPurpose::VerifyEmail);
        let now = DateTime::now();
        let user = User {
            id: UserId::generate(),
            name: name.trim().to_owned(),
            email: email.clone(),
            password_hash,
            verified: false,
            otp: Some(otp.clone()),
            is_admin: false,
            addresses: Vec::new(),
            order_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        self.mail
            .send_verification_code(email.as_str(), &otp.code)
            .await?;

        Ok(user)
    }

    /// Confirm a signup code and mark the account verified.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOtp` if the code is wrong or expired.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<User, AuthError> {
        let user = self.user_by_email(email).await?;

        let challenge = user.otp.as_ref().ok_or(AuthError::InvalidOtp)?;
        if !challenge.accepts(code, OtpPurpose::VerifyEmail, DateTime::now()) {
            return Err(AuthError::InvalidOtp);
        }

        self.users.mark_verified(user.id).await?;

        Ok(User {
            verified: true,
            otp: None,
            ..user
        })
    }

    /// Regenerate and re-email a signup verification code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account matches the email.
    pub async fn resend_otp(&self, email: &str) -> Result<(), AuthError> {
        let user = self.user_by_email(email).await?;

        let otp = new_challenge(OtpPurpose::VerifyEmail);
        self.users.set_otp(user.id, &otp).await?;
        self.mail
            .send_verification_code(user.email.as_str(), &otp.code)
            .await?;

        Ok(())
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    /// Returns `AuthError::NotVerified` for accounts that never confirmed
    /// their code.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        if !user.verified {
            return Err(AuthError::NotVerified);
        }

        Ok(user)
    }

    /// Email a password-reset code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no account matches the email.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let user = self.user_by_email(email).await?;

        let otp = new_challenge(OtpPurpose::ResetPassword);
        self.users.set_otp(user.id, &otp).await?;
        self.mail
            .send_password_reset_code(user.email.as_str(), &otp.code)
            .await?;

        Ok(())
    }

    /// Set a new password after checking the reset code.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidOtp` if the code is wrong or expired.
    /// Returns `AuthError::WeakPassword` if the new password fails the policy.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let user = self.user_by_email(email).await?;

        let challenge = user.otp.as_ref().ok_or(AuthError::InvalidOtp)?;
        if !challenge.accepts(code, OtpPurpose::ResetPassword, DateTime::now()) {
            return Err(AuthError::InvalidOtp);
        }

        validate_password(new_password)?;
        let password_hash = hash_password(new_password)?;

        self.users.set_password_hash(user.id, &password_hash).await?;
        self.users.clear_otp(user.id).await?;

        Ok(())
    }

    async fn user_by_email(&self, email: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        self.users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Build a fresh 10-minute challenge.
fn new_challenge(purpose: OtpPurpose) -> OtpChallenge {
    let expires_at = Utc::now() + Duration::minutes(OTP_TTL_MINUTES);
    OtpChallenge {
        code: generate_otp(),
        purpose,
        expires_at: DateTime::from_chrono(expires_at),
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_too_short() {
        let result = validate_password("short");
        assert!(matches!(result, Err(AuthError::WeakPassword(_))));
    }

    #[test]
    fn test_validate_password_ok() {
        assert!(validate_password("long enough").is_ok());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_password_garbage_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_new_challenge_is_in_the_future() {
        let otp = new_challenge(OtpPurpose::VerifyEmail);
        assert!(otp.expires_at > DateTime::now());
        assert_eq!(otp.code.len(), 6);
    }
}
