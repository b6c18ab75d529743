//! Payment gateway client.
//!
//! Creates gateway-side orders over HTTP and verifies the signature the
//! client submits after completing checkout.

use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::instrument;

use tarini_core::{CURRENCY, Paise};

use crate::config::PaymentConfig;

type HmacSha256 = Hmac<Sha256>;

/// Errors from the payment gateway integration.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The HTTP request itself failed.
    #[error("gateway request failed: {0}")]
    Request(String),

    /// The gateway answered with a non-success status.
    #[error("gateway returned {status}: {message}")]
    Gateway { status: u16, message: String },

    /// The gateway's response body could not be decoded.
    #[error("gateway response could not be decoded: {0}")]
    Response(String),
}

/// A gateway-side order: the provider's record of an intent to charge a
/// specific amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: String,
    /// Amount in minor units (paise).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

/// HTTP client for the payment gateway's orders API.
#[derive(Clone)]
pub struct PaymentClient {
    client: Client,
    base_url: String,
    key_id: String,
    key_secret: SecretString,
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentClient")
            .field("base_url", &self.base_url)
            .field("key_id", &self.key_id)
            .field("key_secret", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl PaymentClient {
    /// Create a new gateway client.
    #[must_use]
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            key_id: config.key_id.clone(),
            key_secret: config.key_secret.clone(),
        }
    }

    /// Create a gateway order for `amount` with a caller-supplied receipt.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError` if the request fails or the gateway rejects it.
    #[instrument(skip(self), fields(amount = amount.as_i64(), receipt = %receipt))]
    pub async fn create_order(
        &self,
        amount: Paise,
        receipt: &str,
    ) -> Result<GatewayOrder, PaymentError> {
        #[derive(Serialize)]
        struct CreateOrder<'a> {
            amount: i64,
            currency: &'a str,
            receipt: &'a str,
        }

        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(self.key_secret.expose_secret()))
            .json(&CreateOrder {
                amount: amount.as_i64(),
                currency: CURRENCY,
                receipt,
            })
            .send()
            .await
            .map_err(|e| PaymentError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Gateway { status, message });
        }

        let order: GatewayOrder = response
            .json()
            .await
            .map_err(|e| PaymentError::Response(e.to_string()))?;

        tracing::info!(gateway_order_id = %order.id, "Gateway order created");
        Ok(order)
    }

    /// Verify a client-submitted payment signature.
    ///
    /// The expected value is `hex(HMAC-SHA256(key_secret, "{order_id}|{payment_id}"))`,
    /// compared by direct equality. Nothing beyond the signature itself guards
    /// against replays.
    #[must_use]
    pub fn verify_signature(
        &self,
        gateway_order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> bool {
        let message = format!("{gateway_order_id}|{payment_id}");

        let Ok(mut mac) = HmacSha256::new_from_slice(self.key_secret.expose_secret().as_bytes())
        else {
            return false;
        };
        mac.update(message.as_bytes());

        let expected = hex::encode(mac.finalize().into_bytes());
        expected == signature
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(secret: &str) -> PaymentClient {
        PaymentClient::new(&PaymentConfig {
            base_url: "https://gateway.test/v1".to_owned(),
            key_id: "rzp_test_key".to_owned(),
            key_secret: SecretString::from(secret.to_owned()),
        })
    }

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_signature_valid() {
        let client = client("gw-secret-1");
        let signature = sign("gw-secret-1", "order_A1", "pay_B2");
        assert!(client.verify_signature("order_A1", "pay_B2", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_wrong_signature() {
        let client = client("gw-secret-1");
        assert!(!client.verify_signature("order_A1", "pay_B2", "deadbeef"));
    }

    #[test]
    fn test_verify_signature_rejects_tampered_ids() {
        let client = client("gw-secret-1");
        let signature = sign("gw-secret-1", "order_A1", "pay_B2");
        assert!(!client.verify_signature("order_A1", "pay_OTHER", &signature));
        assert!(!client.verify_signature("order_OTHER", "pay_B2", &signature));
    }

    #[test]
    fn test_verify_signature_rejects_wrong_secret() {
        let client = client("gw-secret-1");
        let signature = sign("gw-secret-2", "order_A1", "pay_B2");
        assert!(!client.verify_signature("order_A1", "pay_B2", &signature));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let debug = format!("{:?}", client("gw-secret-1"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("gw-secret-1"));
    }
}
