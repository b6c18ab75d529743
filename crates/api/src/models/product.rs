//! Product catalog document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{Paise, ProductId};

/// A saree listing (`products` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    pub description: String,
    /// List price.
    pub price: Paise,
    /// Discounted price shown when a sale is running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<Paise>,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub attributes: ProductAttributes,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Product {
    /// The price a buyer actually pays.
    #[must_use]
    pub fn effective_price(&self) -> Paise {
        self.sale_price.unwrap_or(self.price)
    }

    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// First image, used as the listing thumbnail.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Filterable facets shown in the storefront sidebar.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProductAttributes {
    pub material: String,
    pub occasion: String,
    pub color: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: i64, sale_price: Option<i64>) -> Product {
        Product {
            id: ProductId::generate(),
            title: "Kanjivaram Silk Saree".to_owned(),
            description: "Handwoven, temple border".to_owned(),
            price: Paise::from_rupees(price),
            sale_price: sale_price.map(Paise::from_rupees),
            stock: 4,
            images: vec!["https://cdn.example.com/a.jpg".to_owned()],
            attributes: ProductAttributes::default(),
            created_at: DateTime::now(),
            updated_at: DateTime::now(),
        }
    }

    #[test]
    fn test_effective_price_prefers_sale_price() {
        assert_eq!(
            product(12_999, Some(9_999)).effective_price(),
            Paise::from_rupees(9_999)
        );
        assert_eq!(
            product(12_999, None).effective_price(),
            Paise::from_rupees(12_999)
        );
    }

    #[test]
    fn test_primary_image() {
        assert_eq!(
            product(100, None).primary_image(),
            Some("https://cdn.example.com/a.jpg")
        );
    }
}
