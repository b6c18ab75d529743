//! Application state shared across handlers.

use std::sync::Arc;

use mongodb::Database;

use crate::config::ApiConfig;
use crate::services::email::EmailService;
use crate::services::payment::PaymentClient;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`; gives handlers access to configuration, the
/// database handle, and the outbound clients.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    db: Database,
    payment: PaymentClient,
    mail: EmailService,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP relay host in the configuration is
    /// invalid.
    pub fn new(
        config: ApiConfig,
        db: Database,
    ) -> Result<Self, lettre::transport::smtp::Error> {
        let payment = PaymentClient::new(&config.payment);
        let mail = EmailService::new(&config.email)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                payment,
                mail,
            }),
        })
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the database handle.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the payment gateway client.
    #[must_use]
    pub fn payment(&self) -> &PaymentClient {
        &self.inner.payment
    }

    /// Get a reference to the email service.
    #[must_use]
    pub fn mail(&self) -> &EmailService {
        &self.inner.mail
    }
}
