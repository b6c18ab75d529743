//! Uniform JSON response envelope.
//!
//! Every mutation and every error answers with `{ success, message }`; list
//! and detail endpoints add their payload next to the `success` flag.

use serde::Serialize;

/// The `{ success, message }` body.
#[derive(Debug, Clone, Serialize)]
pub struct ApiMessage {
    pub success: bool,
    pub message: String,
}

impl ApiMessage {
    #[must_use]
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_shape() {
        let json = serde_json::to_value(ApiMessage::failure("nope")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "nope");

        let json = serde_json::to_value(ApiMessage::ok("done")).unwrap();
        assert_eq!(json["success"], true);
    }
}
