//! Status enums for orders, payments, and reviews.

use serde::{Deserialize, Serialize};

/// Order fulfillment status.
///
/// Transitions happen by direct field writes from the admin surface; no
/// transition table constrains which status may follow which.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Processing => write!(f, "processing"),
            Self::Shipped => write!(f, "shipped"),
            Self::Delivered => write!(f, "delivered"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

/// Payment status of an order.
///
/// `Created` covers the window between gateway order creation and signature
/// verification; verification moves it to `Paid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Created,
    Paid,
    Failed,
}

/// Moderation status of a product review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde_is_snake_case() {
        let json = serde_json::to_string(&OrderStatus::Shipped).unwrap();
        assert_eq!(json, "\"shipped\"");

        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_status_from_str_roundtrip() {
        for status in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_order_status_from_str_invalid() {
        assert!("completed".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_defaults() {
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
        assert_eq!(PaymentStatus::default(), PaymentStatus::Created);
        assert_eq!(ReviewStatus::default(), ReviewStatus::Pending);
    }
}
