//! Banner repository.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::BannerId;

use super::RepositoryError;
use crate::models::Banner;

/// Repository for the `banners` collection.
pub struct BannerRepository {
    col: Collection<Banner>,
}

impl BannerRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("banners"),
        }
    }

    /// Insert a new banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, banner: &Banner) -> Result<(), RepositoryError> {
        self.col.insert_one(banner).await?;
        Ok(())
    }

    /// Active banners in display order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Banner>, RepositoryError> {
        Ok(self
            .col
            .find(doc! { "active": true })
            .sort(doc! { "position": 1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Every banner (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Banner>, RepositoryError> {
        Ok(self
            .col
            .find(doc! {})
            .sort(doc! { "position": 1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Replace an existing banner wholesale.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner doesn't exist.
    pub async fn update(&self, banner: &Banner) -> Result<(), RepositoryError> {
        let result = self
            .col
            .replace_one(doc! { "_id": banner.id.as_object_id() }, banner)
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a banner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the banner doesn't exist.
    pub async fn delete(&self, id: BannerId) -> Result<(), RepositoryError> {
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
