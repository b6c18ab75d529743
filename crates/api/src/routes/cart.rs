//! Cart route handlers.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tarini_core::ProductId;

use crate::db::{CartRepository, ProductRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::{Cart, Product};
use crate::state::AppState;

use super::products::parse_product_id;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: String,
    pub quantity: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

/// Cart line with product fields resolved for display.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    pub title: String,
    /// Unit price in whole rupees.
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: u32,
    pub line_total: i64,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: i64,
    pub item_count: u32,
}

#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub success: bool,
    pub cart: CartView,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /user/cart - the cart with product fields populated.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<CartResponse>> {
    let cart = CartRepository::new(state.db()).get_or_create(user.id).await?;
    let view = populate(&state, &cart).await?;

    Ok(Json(CartResponse {
        success: true,
        cart: view,
    }))
}

/// POST /user/cart/items - add a product line.
///
/// Re-adding a product that is already in the cart is rejected with a 409;
/// the existing quantity is left alone.
#[instrument(skip(state, user, form))]
pub async fn add(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = parse_product_id(&form.product_id)?;
    let quantity = form.quantity.unwrap_or(1).max(1);

    // The product must exist before it can be carted.
    ProductRepository::new(state.db())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    let cart = CartRepository::new(state.db())
        .add_item(user.id, product_id, quantity)
        .await?;
    let view = populate(&state, &cart).await?;

    Ok(Json(CartResponse {
        success: true,
        cart: view,
    }))
}

/// PUT /user/cart/items/{product_id} - overwrite a line's quantity.
#[instrument(skip(state, user, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<String>,
    Json(form): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let product_id = parse_product_id(&product_id)?;
    if form.quantity == 0 {
        return Err(ApiError::BadRequest(
            "quantity must be at least 1; remove the item instead".to_owned(),
        ));
    }

    let cart = CartRepository::new(state.db())
        .set_quantity(user.id, product_id, form.quantity)
        .await
        .map_err(missing_line)?;
    let view = populate(&state, &cart).await?;

    Ok(Json(CartResponse {
        success: true,
        cart: view,
    }))
}

/// DELETE /user/cart/items/{product_id} - drop a line.
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(product_id): Path<String>,
) -> Result<Json<CartResponse>> {
    let product_id = parse_product_id(&product_id)?;

    let cart = CartRepository::new(state.db())
        .remove_item(user.id, product_id)
        .await
        .map_err(missing_line)?;
    let view = populate(&state, &cart).await?;

    Ok(Json(CartResponse {
        success: true,
        cart: view,
    }))
}

fn missing_line(err: crate::db::RepositoryError) -> ApiError {
    match err {
        crate::db::RepositoryError::NotFound => {
            ApiError::NotFound("product not in cart".to_owned())
        }
        other => ApiError::Database(other),
    }
}

/// Resolve product titles, prices, and images into the cart lines. Lines
/// whose product has since been deleted are dropped from the view.
async fn populate(state: &AppState, cart: &Cart) -> Result<CartView> {
    let ids: Vec<ProductId> = cart.items.iter().map(|i| i.product_id).collect();
    let products = ProductRepository::new(state.db()).get_many(&ids).await?;
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut items = Vec::with_capacity(cart.items.len());
    let mut subtotal = 0_i64;
    let mut item_count = 0_u32;

    for line in &cart.items {
        let Some(product) = by_id.get(&line.product_id) else {
            continue;
        };
        let price = product.effective_price();
        let line_total = price.times(line.quantity);
        subtotal += line_total.rupees();
        item_count += line.quantity;

        items.push(CartItemView {
            product_id: line.product_id.to_string(),
            title: product.title.clone(),
            price: price.rupees(),
            image: product.primary_image().map(str::to_owned),
            quantity: line.quantity,
            line_total: line_total.rupees(),
        });
    }

    Ok(CartView {
        items,
        subtotal,
        item_count,
    })
}
