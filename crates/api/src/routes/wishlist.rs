//! Wishlist route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::db::{ProductRepository, RepositoryError, WishlistRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::{Wishlist, WishlistItem};
use crate::state::AppState;

use super::products::parse_product_id;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToWishlistRequest {
    pub product_id: String,
}

/// A stored snapshot, as exposed over JSON.
#[derive(Debug, Serialize)]
pub struct WishlistItemView {
    pub product_id: String,
    pub title: String,
    /// Price at wishlisting time, in whole rupees.
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl From<&WishlistItem> for WishlistItemView {
    fn from(item: &WishlistItem) -> Self {
        Self {
            product_id: item.product_id.to_string(),
            title: item.title.clone(),
            price: item.price.rupees(),
            image: item.image.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    pub success: bool,
    pub items: Vec<WishlistItemView>,
}

impl WishlistResponse {
    fn from_wishlist(wishlist: &Wishlist) -> Self {
        Self {
            success: true,
            items: wishlist.items.iter().map(WishlistItemView::from).collect(),
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /user/wishlist - stored snapshots.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<WishlistResponse>> {
    let wishlist = WishlistRepository::new(state.db())
        .get_or_create(user.id)
        .await?;

    Ok(Json(WishlistResponse::from_wishlist(&wishlist)))
}

/// POST /user/wishlist/items - snapshot a product into the wishlist.
#[instrument(skip(state, user, form))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<AddToWishlistRequest>,
) -> Result<Json<WishlistResponse>> {
    let product_id = parse_product_id(&form.product_id)?;
    let product = ProductRepository::new(state.db())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    let item = WishlistItem {
        product_id,
        title: product.title.clone(),
        price: product.effective_price(),
        image: product.primary_image().map(str::to_owned),
    };

    let wishlist = WishlistRepository::new(state.db())
        .add_item(user.id, item)
        .await?;

    Ok(Json(WishlistResponse::from_wishlist(&wishlist)))
}

/// DELETE /user/wishlist/items/{product_id} - drop a snapshot.
///
/// Removing a product that was never wishlisted is a 404 and leaves the
/// stored list untouched.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<String>,
) -> Result<Json<WishlistResponse>> {
    let product_id = parse_product_id(&product_id)?;

    let wishlist = WishlistRepository::new(state.db())
        .remove_item(user.id, product_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("product not in wishlist".to_owned()),
            other => ApiError::Database(other),
        })?;

    Ok(Json(WishlistResponse::from_wishlist(&wishlist)))
}
