//! Admin product CRUD.

use axum::{
    Json,
    extract::{Path, State},
};
use bson::DateTime;
use serde::Deserialize;
use tracing::instrument;

use tarini_core::{Paise, ProductId};

use crate::db::ProductRepository;
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::{Product, ProductAttributes};
use crate::response::ApiMessage;
use crate::routes::products::{ProductResponse, ProductView, ProductsResponse, parse_product_id};
use crate::state::AppState;

/// Product fields as submitted by the admin dashboard; prices in whole
/// rupees.
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub sale_price: Option<i64>,
    pub stock: i64,
    #[serde(default)]
    pub images: Vec<String>,
    pub material: String,
    pub occasion: String,
    pub color: String,
}

impl ProductInput {
    fn into_product(self, id: ProductId, created_at: DateTime) -> Product {
        Product {
            id,
            title: self.title,
            description: self.description,
            price: Paise::from_rupees(self.price),
            sale_price: self.sale_price.map(Paise::from_rupees),
            stock: self.stock,
            images: self.images,
            attributes: ProductAttributes {
                material: self.material,
                occasion: self.occasion,
                color: self.color,
            },
            created_at,
            updated_at: DateTime::now(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title is required".to_owned()));
        }
        if self.price <= 0 {
            return Err(ApiError::BadRequest("price must be positive".to_owned()));
        }
        if self.stock < 0 {
            return Err(ApiError::BadRequest("stock cannot be negative".to_owned()));
        }
        Ok(())
    }
}

/// GET /admin/products - full catalog, including out-of-stock items.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ProductsResponse>> {
    let products = ProductRepository::new(state.db())
        .list(&crate::db::ProductQuery::default())
        .await?;

    Ok(Json(ProductsResponse {
        success: true,
        products: products.iter().map(ProductView::from).collect(),
    }))
}

/// POST /admin/products - add a product.
#[instrument(skip(state, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(form): Json<ProductInput>,
) -> Result<Json<ProductResponse>> {
    form.validate()?;

    let product = form.into_product(ProductId::generate(), DateTime::now());
    ProductRepository::new(state.db()).insert(&product).await?;

    tracing::info!(product_id = %product.id, "product created");

    Ok(Json(ProductResponse {
        success: true,
        product: ProductView::from(&product),
    }))
}

/// PUT /admin/products/{id} - replace a product's fields.
#[instrument(skip(state, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(form): Json<ProductInput>,
) -> Result<Json<ProductResponse>> {
    form.validate()?;

    let product_id = parse_product_id(&id)?;
    let repo = ProductRepository::new(state.db());
    let existing = repo
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    let product = form.into_product(product_id, existing.created_at);
    repo.update(&product).await?;

    Ok(Json(ProductResponse {
        success: true,
        product: ProductView::from(&product),
    }))
}

/// DELETE /admin/products/{id} - remove a product.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    let product_id = parse_product_id(&id)?;
    ProductRepository::new(state.db())
        .delete(product_id)
        .await
        .map_err(|e| match e {
            crate::db::RepositoryError::NotFound => {
                ApiError::NotFound("product not found".to_owned())
            }
            other => ApiError::Database(other),
        })?;

    tracing::info!(product_id = %product_id, "product deleted");

    Ok(Json(ApiMessage::ok("product deleted")))
}
