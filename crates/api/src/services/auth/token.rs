//! Signed auth tokens carried in the session cookie.
//!
//! A token is `base64url(payload).hex(hmac)` where the payload is the user id
//! and a unix expiry. Verification recomputes the MAC over the encoded
//! payload and compares in constant time before trusting anything inside it.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use tarini_core::UserId;

type HmacSha256 = Hmac<Sha256>;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("signature mismatch")]
    BadSignature,
    #[error("token expired")]
    Expired,
}

/// Issue a token for `user_id` valid until `expires_at` (unix seconds).
#[must_use]
pub fn sign(secret: &SecretString, user_id: UserId, expires_at: i64) -> String {
    let payload = URL_SAFE_NO_PAD.encode(format!("{user_id}.{expires_at}"));
    let signature = hex::encode(mac_bytes(secret, &payload));
    format!("{payload}.{signature}")
}

/// Check signature and expiry, returning the embedded user id.
///
/// `now` is the current unix time in seconds.
///
/// # Errors
///
/// Returns `TokenError` if the token is malformed, forged, or expired.
pub fn verify(secret: &SecretString, token: &str, now: i64) -> Result<UserId, TokenError> {
    let (payload, signature) = token.rsplit_once('.').ok_or(TokenError::Malformed)?;

    let expected = hex::encode(mac_bytes(secret, payload));
    if !constant_time_compare(&expected, signature) {
        return Err(TokenError::BadSignature);
    }

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Malformed)?;
    let decoded = String::from_utf8(decoded).map_err(|_| TokenError::Malformed)?;

    let (user_hex, expiry) = decoded.split_once('.').ok_or(TokenError::Malformed)?;
    let expires_at: i64 = expiry.parse().map_err(|_| TokenError::Malformed)?;
    if expires_at <= now {
        return Err(TokenError::Expired);
    }

    UserId::parse(user_hex).map_err(|_| TokenError::Malformed)
}

fn mac_bytes(secret: &SecretString, payload: &str) -> Vec<u8> {
    // HMAC-SHA256 accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(payload.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn secret() -> SecretString {
        SecretString::from("kR7mQ2xW9pT4nL8vB3cJ6hF1dS5gA0zY".to_owned())
    }

    #[test]
    fn test_sign_verify_roundtrip() {
        let user_id = UserId::generate();
        let token = sign(&secret(), user_id, 2_000_000_000);

        let verified = verify(&secret(), &token, 1_000_000_000).unwrap();
        assert_eq!(verified, user_id);
    }

    #[test]
    fn test_verify_rejects_expired() {
        let token = sign(&secret(), UserId::generate(), 1_000);
        assert_eq!(verify(&secret(), &token, 1_000), Err(TokenError::Expired));
        assert_eq!(verify(&secret(), &token, 2_000), Err(TokenError::Expired));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let token = sign(&secret(), UserId::generate(), 2_000_000_000);
        let other = SecretString::from("zY0aG5sD1fH6jC3bV8lN4tP9wX2qM7rK".to_owned());
        assert_eq!(
            verify(&other, &token, 1_000),
            Err(TokenError::BadSignature)
        );
    }

    #[test]
    fn test_verify_rejects_tampered_payload() {
        let token = sign(&secret(), UserId::generate(), 2_000_000_000);
        let (_, signature) = token.rsplit_once('.').unwrap();
        let forged_payload = URL_SAFE_NO_PAD.encode(format!(
            "{}.{}",
            UserId::generate(),
            2_000_000_000_i64
        ));
        let forged = format!("{forged_payload}.{signature}");

        assert!(verify(&secret(), &forged, 1_000).is_err());
    }

    #[test]
    fn test_verify_rejects_garbage() {
        assert_eq!(
            verify(&secret(), "not-a-token", 0),
            Err(TokenError::Malformed)
        );
        assert_eq!(verify(&secret(), "", 0), Err(TokenError::Malformed));
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
    }
}
