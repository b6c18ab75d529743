//! Email service for sending one-time codes.
//!
//! Uses SMTP via lettre. Bodies are plain text; there is no templating layer.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("invalid email address: {0}")]
    InvalidAddress(String),
}

/// Email service for transactional mail.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay host is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
        })
    }

    /// Send a signup verification code.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_verification_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let body = format!(
            "Your Tarini verification code is {code}.\n\n\
             It expires in 10 minutes. If you did not create an account, you can ignore this email."
        );
        self.send_plain(to, "Verify your Tarini account", &body)
            .await
    }

    /// Send a password reset code.
    ///
    /// # Errors
    ///
    /// Returns an error if the message cannot be built or sent.
    pub async fn send_password_reset_code(&self, to: &str, code: &str) -> Result<(), EmailError> {
        let body = format!(
            "Your Tarini password reset code is {code}.\n\n\
             It expires in 10 minutes. If you did not request a reset, you can ignore this email."
        );
        self.send_plain(to, "Reset your Tarini password", &body)
            .await
    }

    async fn send_plain(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent");
        Ok(())
    }
}

/// Generate a 6-digit one-time code.
#[must_use]
pub fn generate_otp() -> String {
    use rand::Rng;
    let code: u32 = rand::rng().random_range(100_000..1_000_000);
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_otp_format() {
        let code = generate_otp();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_generate_otp_range() {
        for _ in 0..100 {
            let code: u32 = generate_otp().parse().expect("valid number");
            assert!(code >= 100_000);
            assert!(code < 1_000_000);
        }
    }
}
