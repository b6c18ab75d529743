//! Order repository.

use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use tarini_core::{OrderId, OrderStatus, UserId};

use super::RepositoryError;
use crate::models::Order;

/// Repository for the `orders` collection.
pub struct OrderRepository {
    col: Collection<Order>,
}

impl OrderRepository {
    #[must_use]
    pub fn new(db: &Database) -> Self {
        Self {
            col: db.collection("orders"),
        }
    }

    /// Insert a verified order.
    ///
    /// No uniqueness applies to the gateway order id, so re-verifying the
    /// same payment inserts a second document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert(&self, order: &Order) -> Result<(), RepositoryError> {
        self.col.insert_one(order).await?;
        Ok(())
    }

    /// Get an order by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        Ok(self
            .col
            .find_one(doc! { "_id": id.as_object_id() })
            .await?)
    }

    /// List a user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .col
            .find(doc! { "user_id": user_id.as_object_id() })
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// List every order, newest first (admin surface).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .col
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await?
            .try_collect()
            .await?)
    }

    /// Assign a fulfillment status directly.
    ///
    /// Any status may follow any other; there is no transition table.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
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
}
