//! Wishlist repository.

use bson::DateTime;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::{ProductId, UserId};

use super::{RepositoryError, is_duplicate_key};
use crate::models::{Wishlist, WishlistItem};

/// Repository for the `wishlists` collection.
pub struct WishlistRepository {
    col: Collection<Wishlist>,
}

impl WishlistRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("wishlists"),
        }
    }

    /// Fetch the user's wishlist, creating an empty one on first touch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Wishlist, RepositoryError> {
        if let Some(wishlist) = self
            .col
            .find_one(doc! { "user_id": user_id.as_object_id() })
            .await?
        {
            return Ok(wishlist);
        }

        let wishlist = Wishlist::new(user_id);
        match self.col.insert_one(&wishlist).await {
            Ok(_) => Ok(wishlist),
            Err(e) if is_duplicate_key(&e) => self
                .col
                .find_one(doc! { "user_id": user_id.as_object_id() })
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    /// Add a product snapshot to the user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already listed.
    pub async fn add_item(
        &self,
        user_id: UserId,
        item: WishlistItem,
    ) -> Result<Wishlist, RepositoryError> {
        let mut wishlist = self.get_or_create(user_id).await?;
        if !wishlist.add_item(item) {
            return Err(RepositoryError::Conflict(
                "product already in wishlist".to_owned(),
            ));
        }
        self.save(&mut wishlist).await?;
        Ok(wishlist)
    }

    /// Remove a product snapshot.
    ///
    /// The not-found case performs no write, so the stored wishlist is
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not listed.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Wishlist, RepositoryError> {
        let mut wishlist = self.get_or_create(user_id).await?;
        if !wishlist.remove_item(product_id) {
            return Err(RepositoryError::NotFound);
        }
        self.save(&mut wishlist).await?;
        Ok(wishlist)
    }

    async fn save(&self, wishlist: &mut Wishlist) -> Result<(), RepositoryError> {
        wishlist.updated_at = DateTime::now();
        self.col
            .replace_one(doc! { "_id": wishlist.id.as_object_id() }, &*wishlist)
            .await?;
        Ok(())
    }
}
