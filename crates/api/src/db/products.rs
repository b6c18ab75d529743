//! Product repository.

use bson::DateTime;
use futures::TryStreamExt;
use mongodb::bson::{Bson, doc};
use mongodb::{Collection, Database};
use serde::Deserialize;

use tarini_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

/// Catalog filters accepted by the public listing endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ProductQuery {
    pub material: Option<String>,
    pub occasion: Option<String>,
    pub color: Option<String>,
    /// Case-insensitive match against the title.
    pub q: Option<String>,
}

/// Repository for the `products` collection.
pub struct ProductRepository {
    col: Collection<Product>,
}

impl ProductRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("products"),
        }
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, product: &Product) -> Result<(), RepositoryError> {
        self.col.insert_one(product).await?;
        Ok(())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .col
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    /// Fetch several products at once, in no particular order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Bson> = ids.iter().map(|id| Bson::from(id.as_object_id())).collect();
        Ok(self
            .col
            .find(doc! { "_id": { "$in": ids } })
            .await?
            .try_collect()
            .await?)
    }

    /// List products matching the given filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, query: &ProductQuery) -> Result<Vec<Product>, RepositoryError> {
        let mut filter = doc! {};
        if let Some(material) = &query.material {
            filter.insert("attributes.material", material.as_str());
        }
        if let Some(occasion) = &query.occasion {
            filter.insert("attributes.occasion", occasion.as_str());
        }
        if let Some(color) = &query.color {
            filter.insert("attributes.color", color.as_str());
        }
        if let Some(q) = &query.q {
            filter.insert("title", doc! { "$regex": q.as_str(), "$options": "i" });
        }

        Ok(self
            .col
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Replace an existing product wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn update(&self, product: &Product) -> Result<(), RepositoryError> {
        let result = self
            .col
            .replace_one(doc! { "_id": product.id.as_object_id() }, product)
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = self
            .col
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;

        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Knock `quantity` units off the stock counter.
    ///
    /// Plain `$inc`; nothing stops the counter going negative under
    /// concurrent checkouts.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn decrement_stock(
        &self,
        id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        self.col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$inc": { "stock": -i64::from(quantity) },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }
}
