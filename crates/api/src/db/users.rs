//! User repository.

use bson::DateTime;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::{AddressId, Email, OrderId, UserId};

use super::{RepositoryError, is_duplicate_key};
use crate::models::user::{Address, OtpChallenge, User};

/// Repository for the `users` collection.
pub struct UserRepository {
    col: Collection<User>,
}

impl UserRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("users"),
        }
    }

    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    pub async fn create(&self, user: &User) -> Result<(), RepositoryError> {
        self.col.insert_one(user).await.map_err(|e| {
            if is_duplicate_key(&e) {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;
        Ok(())
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .col
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    /// Get a user by their (normalized) email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.col.find_one(doc! { "email": email.as_str() }).await?)
    }

    /// Attach a fresh OTP challenge, replacing any pending one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_otp(&self, id: UserId, otp: &OtpChallenge) -> Result<(), RepositoryError> {
        let otp = bson::to_bson(otp).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize otp challenge: {e}"))
        })?;
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "otp": otp, "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Mark a user verified and drop the pending challenge.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn mark_verified(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$set": { "verified": true, "updated_at": DateTime::now() },
                    "$unset": { "otp": "" },
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Drop a pending challenge without touching the verified flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn clear_otp(&self, id: UserId) -> Result<(), RepositoryError> {
        self.col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$unset": { "otp": "" },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn set_password_hash(
        &self,
        id: UserId,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! { "$set": { "password_hash": password_hash, "updated_at": DateTime::now() } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Append an address to the embedded list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist.
    pub async fn add_address(&self, id: UserId, address: &Address) -> Result<(), RepositoryError> {
        let address = bson::to_bson(address).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize address: {e}"))
        })?;
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$push": { "addresses": address },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Replace an embedded address in place.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or address doesn't exist.
    pub async fn update_address(
        &self,
        id: UserId,
        address: &Address,
    ) -> Result<(), RepositoryError> {
        let serialized = bson::to_bson(address).map_err(|e| {
            RepositoryError::DataCorruption(format!("failed to serialize address: {e}"))
        })?;
        let result = self
            .col
            .update_one(
                doc! {
                    "_id": id.as_object_id(),
                    "addresses.id": address.id.as_object_id(),
                },
                doc! {
                    "$set": { "addresses.$": serialized, "updated_at": DateTime::now() },
                },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove an embedded address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or address doesn't exist.
    pub async fn delete_address(
        &self,
        id: UserId,
        address_id: AddressId,
    ) -> Result<(), RepositoryError> {
        let result = self
            .col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$pull": { "addresses": { "id": address_id.as_object_id() } },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;

        if result.matched_count == 0 || result.modified_count == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Append an order id to the user's order list.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn push_order_id(&self, id: UserId, order_id: OrderId) -> Result<(), RepositoryError> {
        self.col
            .update_one(
                doc! { "_id": id.as_object_id() },
                doc! {
                    "$push": { "order_ids": order_id.as_object_id() },
                    "$set": { "updated_at": DateTime::now() },
                },
            )
            .await?;
        Ok(())
    }

    /// List all users, newest first (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .col
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }
}
