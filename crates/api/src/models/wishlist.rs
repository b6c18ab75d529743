//! Wishlist document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{Paise, ProductId, UserId, WishlistId};

/// A user's wishlist (`wishlists` collection, one per user via unique index).
///
/// Items are denormalized product snapshots taken at the moment of
/// wishlisting; later price or title edits do not rewrite them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wishlist {
    #[serde(rename = "_id")]
    pub id: WishlistId,
    pub user_id: UserId,
    #[serde(default)]
    pub items: Vec<WishlistItem>,
    pub updated_at: DateTime,
}

/// Snapshot of a product at wishlisting time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WishlistItem {
    pub product_id: ProductId,
    pub title: String,
    pub price: Paise,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Wishlist {
    /// An empty wishlist for `user_id`.
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: WishlistId::generate(),
            user_id,
            items: Vec::new(),
            updated_at: DateTime::now(),
        }
    }

    /// Add a snapshot. Returns `false` when the product is already listed.
    pub fn add_item(&mut self, item: WishlistItem) -> bool {
        if self.items.iter().any(|i| i.product_id == item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove the snapshot for `product_id`. Returns `false` when absent,
    /// in which case the list is untouched.
    pub fn remove_item(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(product_id: ProductId) -> WishlistItem {
        WishlistItem {
            product_id,
            title: "Banarasi Georgette Saree".to_owned(),
            price: Paise::from_rupees(4_599),
            image: None,
        }
    }

    #[test]
    fn test_add_item_rejects_duplicates() {
        let mut wishlist = Wishlist::new(UserId::generate());
        let product = ProductId::generate();

        assert!(wishlist.add_item(snapshot(product)));
        assert!(!wishlist.add_item(snapshot(product)));
        assert_eq!(wishlist.items.len(), 1);
    }

    #[test]
    fn test_remove_missing_item_leaves_list_unchanged() {
        let mut wishlist = Wishlist::new(UserId::generate());
        let kept = ProductId::generate();
        wishlist.add_item(snapshot(kept));

        assert!(!wishlist.remove_item(ProductId::generate()));
        assert_eq!(wishlist.items.len(), 1);
        assert_eq!(wishlist.items[0].product_id, kept);
    }

    #[test]
    fn test_remove_existing_item() {
        let mut wishlist = Wishlist::new(UserId::generate());
        let product = ProductId::generate();
        wishlist.add_item(snapshot(product));

        assert!(wishlist.remove_item(product));
        assert!(wishlist.items.is_empty());
    }
}
