//! Order documents and the pre-verification draft.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{OrderId, OrderStatus, Paise, PaymentStatus, ProductId, UserId};

use super::user::Address;

/// A placed order (`orders` collection).
///
/// Orders are only ever inserted by payment verification, so a persisted
/// order always carries a gateway order id and a payment id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    /// The payment provider's order record backing this order.
    pub gateway_order_id: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Total captured at creation time; not recomputed afterwards.
    pub amount: Paise,
    pub paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<DateTime>,
    pub created_at: DateTime,
}

/// A line item: product reference, quantity, and unit price at order time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Paise,
}

impl OrderItem {
    #[must_use]
    pub const fn line_total(&self) -> Paise {
        self.price.times(self.quantity)
    }
}

/// An order awaiting payment verification.
///
/// Drafts are returned to the client next to the gateway order and are never
/// written to the store; verification turns one into an [`Order`].
#[derive(Debug, Clone, Serialize)]
pub struct OrderDraft {
    pub gateway_order_id: String,
    pub user_id: UserId,
    pub items: Vec<OrderItem>,
    pub shipping_address: Address,
    pub amount: Paise,
}

impl OrderDraft {
    /// Sum of line totals.
    #[must_use]
    pub fn item_total(items: &[OrderItem]) -> Paise {
        items.iter().map(OrderItem::line_total).sum()
    }

    /// Consume the draft into a persisted-shape order marked paid.
    ///
    /// Each call mints a fresh order id; nothing ties two calls with the
    /// same gateway order together.
    #[must_use]
    pub fn into_paid_order(self, payment_id: String, now: DateTime) -> Order {
        Order {
            id: OrderId::generate(),
            gateway_order_id: self.gateway_order_id,
            user_id: self.user_id,
            items: self.items,
            shipping_address: self.shipping_address,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Paid,
            amount: self.amount,
            paid: true,
            payment_id: Some(payment_id),
            paid_at: Some(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tarini_core::AddressId;

    use super::*;

    fn address() -> Address {
        Address {
            id: AddressId::generate(),
            full_name: "Meera Iyer".to_owned(),
            line1: "14 MG Road".to_owned(),
            line2: None,
            city: "Bengaluru".to_owned(),
            state: "Karnataka".to_owned(),
            pincode: "560001".to_owned(),
            phone: "9876543210".to_owned(),
        }
    }

    fn draft() -> OrderDraft {
        let items = vec![
            OrderItem {
                product_id: ProductId::generate(),
                quantity: 2,
                price: Paise::from_rupees(4_599),
            },
            OrderItem {
                product_id: ProductId::generate(),
                quantity: 1,
                price: Paise::from_rupees(12_999),
            },
        ];
        let amount = OrderDraft::item_total(&items);
        OrderDraft {
            gateway_order_id: "order_Nf3kq2ZT1".to_owned(),
            user_id: UserId::generate(),
            items,
            shipping_address: address(),
            amount,
        }
    }

    #[test]
    fn test_item_total_is_sum_of_price_times_quantity() {
        let d = draft();
        assert_eq!(
            OrderDraft::item_total(&d.items),
            Paise::from_rupees(4_599 * 2 + 12_999)
        );
    }

    #[test]
    fn test_into_paid_order_marks_payment() {
        let now = DateTime::now();
        let order = draft().into_paid_order("pay_8LkzX0".to_owned(), now);

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert!(order.paid);
        assert_eq!(order.payment_id.as_deref(), Some("pay_8LkzX0"));
        assert_eq!(order.paid_at, Some(now));
        assert_eq!(order.created_at, now);
    }

    // Known gap, kept deliberately: verification has no idempotency guard, so
    // submitting the same valid payload twice persists two distinct orders.
    #[test]
    fn test_same_draft_verified_twice_yields_two_distinct_orders() {
        let now = DateTime::now();
        let first = draft().into_paid_order("pay_8LkzX0".to_owned(), now);
        let second = draft().into_paid_order("pay_8LkzX0".to_owned(), now);

        assert_eq!(first.gateway_order_id, second.gateway_order_id);
        assert_ne!(first.id, second.id);
    }
}
