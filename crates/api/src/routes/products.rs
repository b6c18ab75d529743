//! Public catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Serialize;
use tracing::instrument;

use tarini_core::ProductId;

use crate::db::{ProductQuery, ProductRepository};
use crate::error::{ApiError, Result};
use crate::models::Product;
use crate::state::AppState;

// =============================================================================
// Response Types
// =============================================================================

/// Product as exposed over JSON; prices in whole rupees.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub price: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<i64>,
    pub stock: i64,
    pub in_stock: bool,
    pub images: Vec<String>,
    pub material: String,
    pub occasion: String,
    pub color: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price.rupees(),
            sale_price: product.sale_price.map(|p| p.rupees()),
            stock: product.stock,
            in_stock: product.in_stock(),
            images: product.images.clone(),
            material: product.attributes.material.clone(),
            occasion: product.attributes.occasion.clone(),
            color: product.attributes.color.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: ProductView,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /user/products - listing with optional facet filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<ProductsResponse>> {
    let products = ProductRepository::new(state.db()).list(&query).await?;

    Ok(Json(ProductsResponse {
        success: true,
        products: products.iter().map(ProductView::from).collect(),
    }))
}

/// GET /user/products/{id} - product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>> {
    let product_id = parse_product_id(&id)?;
    let product = ProductRepository::new(state.db())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    Ok(Json(ProductResponse {
        success: true,
        product: ProductView::from(&product),
    }))
}

pub(crate) fn parse_product_id(raw: &str) -> Result<ProductId> {
    ProductId::parse(raw).map_err(|_| ApiError::BadRequest("invalid product id".to_owned()))
}
