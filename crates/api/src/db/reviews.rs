//! Review repository.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::{ProductId, ReviewId, ReviewStatus};

use super::RepositoryError;
use crate::models::Review;

/// Repository for the `reviews` collection.
pub struct ReviewRepository {
    col: Collection<Review>,
}

impl ReviewRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("reviews"),
        }
    }

    /// Insert a new review (starts pending).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, review: &Review) -> Result<(), RepositoryError> {
        self.col.insert_one(review).await?;
        Ok(())
    }

    /// Approved reviews for a product, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_approved_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<Review>, RepositoryError> {
        Ok(self
            .col
            .find(doc! {
                "product_id": product_id.as_object_id(),
                "status": "approved",
            })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Every review, newest first (admin moderation queue).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Review>, RepositoryError> {
        Ok(self
            .col
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Assign a moderation status directly.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    pub async fn set_status(
        &self,
        id: ReviewId,
        status: ReviewStatus,
    ) -> Result<(), RepositoryError> {
        let status = bson::to_bson(&status).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize status: {e}"))
        })?;
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "status": status } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a review.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the review doesn't exist.
    pub async fn delete(&self, id: ReviewId) -> Result<(), RepositoryError> {
        let result = self
            .col
            .delete_one(doc! { "_id": id.as_object_id() })
            .await?;

        if result.deleted_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
