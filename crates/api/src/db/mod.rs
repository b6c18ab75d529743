//! Database operations against MongoDB.
//!
//! # Database: `tarini`
//!
//! ## Collections
//!
//! - `users` - Accounts, embedded addresses, OTP challenges
//! - `products` - Saree catalog
//! - `carts` - One per user
//! - `wishlists` - One per user, denormalized snapshots
//! - `orders` - Paid orders (inserted by payment verification only)
//! - `reviews` - Customer reviews awaiting moderation
//! - `banners` - Home page banners
//!
//! There is no migration step; [`ensure_indexes`] creates the unique indexes
//! the data model relies on at startup.

pub mod banners;
pub mod carts;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;
pub mod wishlists;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Database, IndexModel};
use secrecy::ExposeSecret;
use thiserror::Error;

pub use banners::BannerRepository;
pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::{ProductQuery, ProductRepository};
pub use reviews::ReviewRepository;
pub use users::UserRepository;
pub use wishlists::WishlistRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Driver error from MongoDB.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate email, duplicate cart line).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Connect to MongoDB and select the application database.
///
/// # Errors
///
/// Returns `mongodb::error::Error` if the connection string is invalid.
pub async fn connect(
    uri: &secrecy::SecretString,
    database: &str,
) -> Result<Database, mongodb::error::Error> {
    let client = Client::with_uri_str(uri.expose_secret()).await?;
    Ok(client.database(database))
}

/// Create the unique indexes the data model relies on.
///
/// One account per email, one cart per user, one wishlist per user.
///
/// # Errors
///
/// Returns `mongodb::error::Error` if index creation fails.
pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let unique = |keys| {
        IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build()
    };

    db.collection::<crate::models::User>("users")
        .create_index(unique(doc! { "email": 1 }))
        .await?;
    db.collection::<crate::models::Cart>("carts")
        .create_index(unique(doc! { "user_id": 1 }))
        .await?;
    db.collection::<crate::models::Wishlist>("wishlists")
        .create_index(unique(doc! { "user_id": 1 }))
        .await?;

    Ok(())
}

/// Whether a driver error is a unique-index violation (E11000).
pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}
