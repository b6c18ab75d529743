//! Admin order views and status assignment.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use tarini_core::OrderId;

use crate::db::{OrderRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiMessage;
use crate::routes::orders::{OrderView, OrdersResponse, SetStatusRequest, populate};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub order: OrderView,
}

/// GET /admin/orders - every order, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<OrdersResponse>> {
    let orders = OrderRepository::new(state.db()).list_all().await?;
    let orders = populate(state.db(), orders).await?;

    Ok(Json(OrdersResponse {
        success: true,
        orders,
    }))
}

/// GET /admin/orders/{id} - a single order with populated items.
#[instrument(skip(state, _admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let order_id = parse_order_id(&id)?;
    let order = OrderRepository::new(state.db())
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("order not found".to_owned()))?;

    let mut views = populate(state.db(), vec![order]).await?;
    let order = views
        .pop()
        .ok_or_else(|| ApiError::Internal("populated order vanished".to_owned()))?;

    Ok(Json(OrderResponse {
        success: true,
        order,
    }))
}

/// PUT /admin/orders/{id}/status - assign a fulfillment status.
///
/// A direct field write; any status may follow any other.
#[instrument(skip(state, _admin))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(form): Json<SetStatusRequest>,
) -> Result<Json<ApiMessage>> {
    let order_id = parse_order_id(&id)?;
    OrderRepository::new(state.db())
        .set_status(order_id, form.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("order not found".to_owned()),
            other => ApiError::Database(other),
        })?;

    tracing::info!(order_id = %order_id, status = %form.status, "order status assigned");

    Ok(Json(ApiMessage::ok("order status updated")))
}

fn parse_order_id(raw: &str) -> Result<OrderId> {
    OrderId::parse(raw).map_err(|_| ApiError::BadRequest("invalid order id".to_owned()))
}
