//! Cart repository.
//!
//! Carts are load-modify-store; concurrent updates to the same cart can race
//! and last-writer-wins, which is acceptable for this storefront.

use bson::DateTime;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::{ProductId, UserId};

use super::{RepositoryError, is_duplicate_key};
use crate::models::Cart;

/// Repository for the `carts` collection.
pub struct CartRepository {
    col: Collection<Cart>,
}

impl CartRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("carts"),
        }
    }

    /// Fetch the user's cart, creating an empty one on first touch.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        if let Some(cart) = self
            .col
            .find_one(doc! { "user_id": user_id.as_object_id() })
            .await?
        {
            return Ok(cart);
        }

        let cart = Cart::new(user_id);
        match self.col.insert_one(&cart).await {
            Ok(_) => Ok(cart),
            // Lost the race against a concurrent first touch; the unique
            // index on user_id means the other writer's cart exists now.
            Err(e) if is_duplicate_key(&e) => self
                .col
                .find_one(doc! { "user_id": user_id.as_object_id() })
                .await?
                .ok_or(RepositoryError::NotFound),
            Err(e) => Err(RepositoryError::Database(e)),
        }
    }

    /// Add a product line to the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the product is already in the
    /// cart; the existing line keeps its quantity.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        let mut cart = self.get_or_create(user_id).await?;
        if !cart.add_item(product_id, quantity) {
            return Err(RepositoryError::Conflict(
                "product already in cart".to_owned(),
            ));
        }
        self.save(&mut cart).await?;
        Ok(cart)
    }

    /// Overwrite a line's quantity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Cart, RepositoryError> {
        let mut cart = self.get_or_create(user_id).await?;
        if !cart.set_quantity(product_id, quantity) {
            return Err(RepositoryError::NotFound);
        }
        self.save(&mut cart).await?;
        Ok(cart)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product is not in the cart.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<Cart, RepositoryError> {
        let mut cart = self.get_or_create(user_id).await?;
        if !cart.remove_item(product_id) {
            return Err(RepositoryError::NotFound);
        }
        self.save(&mut cart).await?;
        Ok(cart)
    }

    /// Empty the user's cart (after a successful payment).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        self.col
            .update_one(
                doc! { "user_id": user_id.as_object_id() },
                doc! { "$set": { "items": [], "updated_at": DateTime::now() } },
            )
            .await?;
        Ok(())
    }

    async fn save(&self, cart: &mut Cart) -> Result<(), RepositoryError> {
        cart.updated_at = DateTime::now();
        self.col
            .replace_one(doc! { "_id": cart.id.as_object_id() }, &*cart)
            .await?;
        Ok(())
    }
}
