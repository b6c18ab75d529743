//! Cart document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{CartId, ProductId, UserId};

/// A user's cart (`carts` collection, one per user via unique index).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    #[serde(rename = "_id")]
    pub id: CartId,
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<CartItem>,
    pub updated_at: DateTime,
}

/// A product reference plus quantity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl Cart {
    /// An empty cart for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: CartId::generate(),
            user_id,
            items: Vec::new(),
            updated_at: DateTime::now(),
        }
    }

    #[must_use]
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Add a line for `product_id`.
    ///
    /// Returns `false` when the product is already in the cart; the existing
    /// line is left untouched rather than having its quantity bumped.
    pub fn add_item(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if self.contains(product_id) {
            return false;
        }
        self.items.push(CartItem {
            product_id,
            quantity,
        });
        true
    }

    /// Overwrite the quantity of an existing line. Returns `false` when the
    /// product is not in the cart.
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove the line for `product_id`. Returns `false` when absent.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new(UserId::generate());
        let product = ProductId::generate();

        assert!(cart.add_item(product, 2));
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_add_duplicate_reports_failure_without_touching_quantity() {
        let mut cart = Cart::new(UserId::generate());
        let product = ProductId::generate();

        assert!(cart.add_item(product, 2));
        assert!(!cart.add_item(product, 5));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new(UserId::generate());
        let product = ProductId::generate();
        cart.add_item(product, 1);

        assert!(cart.set_quantity(product, 4));
        assert_eq!(cart.items[0].quantity, 4);

        assert!(!cart.set_quantity(ProductId::generate(), 4));
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new(UserId::generate());
        let product = ProductId::generate();
        cart.add_item(product, 1);

        assert!(cart.remove_item(product));
        assert!(cart.items.is_empty());
        assert!(!cart.remove_item(product));
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new(UserId::generate());
        cart.add_item(ProductId::generate(), 1);
        cart.add_item(ProductId::generate(), 2);

        cart.clear();
        assert!(cart.items.is_empty());
    }
}
