//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TARINI_MONGODB_URI` - MongoDB connection string (falls back to `MONGODB_URI`)
//! - `TARINI_TOKEN_SECRET` - Auth token signing secret (min 32 chars)
//! - `TARINI_PAYMENT_KEY_ID` - Payment gateway key id
//! - `TARINI_PAYMENT_KEY_SECRET` - Payment gateway key secret
//! - `TARINI_SMTP_HOST` - SMTP relay host
//! - `TARINI_SMTP_USERNAME` - SMTP username
//! - `TARINI_SMTP_PASSWORD` - SMTP password
//! - `TARINI_EMAIL_FROM` - From address for outgoing mail
//!
//! ## Optional
//! - `TARINI_DATABASE` - Database name (default: tarini)
//! - `TARINI_HOST` - Bind address (default: 127.0.0.1)
//! - `TARINI_PORT` - Listen port (default: 8000)
//! - `TARINI_TOKEN_TTL_HOURS` - Auth cookie lifetime (default: 72)
//! - `TARINI_PAYMENT_BASE_URL` - Gateway API base (default: Razorpay v1)
//! - `TARINI_SMTP_PORT` - SMTP port (default: 587)
//! - `TARINI_CORS_ORIGIN` - Allowed browser origin
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_TOKEN_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API application configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// MongoDB connection string (contains credentials)
    pub mongodb_uri: SecretString,
    /// Database name
    pub database: String,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Auth token signing secret
    pub auth_token_secret: SecretString,
    /// Auth cookie lifetime in hours
    pub token_ttl_hours: i64,
    /// Payment gateway configuration
    pub payment: PaymentConfig,
    /// SMTP configuration
    pub email: EmailConfig,
    /// Allowed browser origin for CORS, if any
    pub cors_origin: Option<String>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Payment gateway configuration.
///
/// Implements `Debug` manually to redact the key secret.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Gateway orders API base URL
    pub base_url: String,
    /// Public key id (sent as basic auth username)
    pub key_id: String,
    /// Key secret; also the HMAC key for signature verification
    pub key_secret: SecretString,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish()
    }
}

/// SMTP relay configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let mongodb_uri = get_mongodb_uri("TARINI_MONGODB_URI")?;
        let database = get_env_or_default("TARINI_DATABASE", "tarini");
        let host = get_env_or_default("TARINI_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TARINI_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TARINI_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TARINI_PORT".to_string(), e.to_string()))?;

        let auth_token_secret = get_validated_secret("TARINI_TOKEN_SECRET")?;
        validate_token_secret(&auth_token_secret, "TARINI_TOKEN_SECRET")?;
        let token_ttl_hours = get_env_or_default("TARINI_TOKEN_TTL_HOURS", "72")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TARINI_TOKEN_TTL_HOURS".to_string(), e.to_string())
            })?;

        let payment = PaymentConfig::from_env()?;
        let email = EmailConfig::from_env()?;
        let cors_origin = get_optional_env("TARINI_CORS_ORIGIN");
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            mongodb_uri,
            database,
            host,
            port,
            auth_token_secret,
            token_ttl_hours,
            payment,
            email,
            cors_origin,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl PaymentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: get_env_or_default("TARINI_PAYMENT_BASE_URL", "https://api.razorpay.com/v1"),
            key_id: get_required_env("TARINI_PAYMENT_KEY_ID")?,
            key_secret: get_validated_secret("TARINI_PAYMENT_KEY_SECRET")?,
        })
    }
}

impl EmailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_port = get_env_or_default("TARINI_SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TARINI_SMTP_PORT".to_string(), e.to_string())
            })?;

        Ok(Self {
            smtp_host: get_required_env("TARINI_SMTP_HOST")?,
            smtp_port,
            smtp_username: get_required_env("TARINI_SMTP_USERNAME")?,
            smtp_password: get_validated_secret("TARINI_SMTP_PASSWORD")?,
            from_address: get_required_env("TARINI_EMAIL_FROM")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get the MongoDB URI with fallback to the generic `MONGODB_URI`.
fn get_mongodb_uri(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("MONGODB_URI") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that the token secret meets minimum length requirements.
fn validate_token_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_TOKEN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_TOKEN_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Validate that a secret is not an obvious placeholder.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(matches!(
            result,
            Err(ConfigError::InsecureSecret(_, _))
        ));
    }

    #[test]
    fn test_validate_secret_strength_changeme() {
        assert!(validate_secret_strength("changeme123", "TEST_VAR").is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        assert!(validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR").is_ok());
    }

    #[test]
    fn test_validate_token_secret_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_token_secret(&secret, "TEST_SECRET").is_err());
    }

    #[test]
    fn test_validate_token_secret_valid_length() {
        let secret = SecretString::from("k".repeat(32));
        assert!(validate_token_secret(&secret, "TEST_SECRET").is_ok());
    }

    #[test]
    fn test_payment_config_debug_redacts_secret() {
        let config = PaymentConfig {
            base_url: "https://api.razorpay.com/v1".to_string(),
            key_id: "rzp_live_abc".to_string(),
            key_secret: SecretString::from("super_private_key_material"),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("rzp_live_abc"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_private_key_material"));
    }

    #[test]
    fn test_email_config_debug_redacts_password() {
        let config = EmailConfig {
            smtp_host: "smtp.relay.test".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("smtp_password_value"),
            from_address: "no-reply@tarini.shop".to_string(),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("smtp.relay.test"));
        assert!(!debug_output.contains("smtp_password_value"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            mongodb_uri: SecretString::from("mongodb://localhost:27017"),
            database: "tarini".to_string(),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            auth_token_secret: SecretString::from("k".repeat(32)),
            token_ttl_hours: 72,
            payment: PaymentConfig {
                base_url: "https://api.razorpay.com/v1".to_string(),
                key_id: "rzp_test_abc".to_string(),
                key_secret: SecretString::from("k".repeat(24)),
            },
            email: EmailConfig {
                smtp_host: "smtp.relay.test".to_string(),
                smtp_port: 587,
                smtp_username: "mailer".to_string(),
                smtp_password: SecretString::from("p".repeat(16)),
                from_address: "no-reply@tarini.shop".to_string(),
            },
            cors_origin: None,
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }
}
