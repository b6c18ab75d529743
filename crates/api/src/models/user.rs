//! User account document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{AddressId, Email, OrderId, UserId};

/// A customer account (`users` collection).
///
/// Addresses are embedded, and placed orders are referenced by id. The
/// password hash never leaves this type; views expose everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub password_hash: String,
    pub verified: bool,
    /// Pending one-time code, if any. Cleared on successful verification.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<OtpChallenge>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub order_ids: Vec<OrderId>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl User {
    /// Look up an embedded address by id.
    #[must_use]
    pub fn address(&self, id: AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| a.id == id)
    }
}

/// A one-time code attached to a user, awaiting confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpChallenge {
    pub code: String,
    pub purpose: OtpPurpose,
    pub expires_at: DateTime,
}

impl OtpChallenge {
    /// Whether `code` matches this challenge for `purpose` and has not expired.
    #[must_use]
    pub fn accepts(&self, code: &str, purpose: OtpPurpose, now: DateTime) -> bool {
        self.purpose == purpose && self.code == code && now < self.expires_at
    }
}

/// What an emailed one-time code is allowed to prove.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    VerifyEmail,
    ResetPassword,
}

/// A shipping address, embedded in the user document and copied onto orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: AddressId,
    pub full_name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn challenge(expires_in_ms: i64) -> OtpChallenge {
        OtpChallenge {
            code: "482913".to_owned(),
            purpose: OtpPurpose::VerifyEmail,
            expires_at: DateTime::from_millis(DateTime::now().timestamp_millis() + expires_in_ms),
        }
    }

    #[test]
    fn test_otp_accepts_matching_code() {
        let otp = challenge(60_000);
        assert!(otp.accepts("482913", OtpPurpose::VerifyEmail, DateTime::now()));
    }

    #[test]
    fn test_otp_rejects_wrong_code() {
        let otp = challenge(60_000);
        assert!(!otp.accepts("000000", OtpPurpose::VerifyEmail, DateTime::now()));
    }

    #[test]
    fn test_otp_rejects_wrong_purpose() {
        let otp = challenge(60_000);
        assert!(!otp.accepts("482913", OtpPurpose::ResetPassword, DateTime::now()));
    }

    #[test]
    fn test_otp_rejects_expired_code() {
        let otp = challenge(-1);
        assert!(!otp.accepts("482913", OtpPurpose::VerifyEmail, DateTime::now()));
    }

    #[test]
    fn test_address_lookup() {
        let address = Address {
            id: tarini_core::AddressId::generate(),
            full_name: "Meera Iyer".to_owned(),
            line1: "14 MG Road".to_owned(),
            line2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            pincode: "560001".to_owned(),
            phone: "9876543210".to_owned(),
        };
        let user = User {
            id: UserId::generate(),
            name: "Meera".to_owned(),
            email: Email::parse("meera@example.com").unwrap(),
            password_hash: String::new(),
            verified: true,
            otp: None,
            is_admin: false,
            addresses: vec![address.clone()],
            order_ids: Vec::new(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        };

        assert!(user.address(address.id).is_some());
        assert!(user.address(tarini_core::AddressId::generate()).is_none());
    }
}
