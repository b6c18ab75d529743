//! Admin route handlers.
//!
//! Every handler requires the `RequireAdmin` extractor; there is no separate
//! admin credential store, just the `is_admin` flag on the account.

pub mod banners;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod users;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

/// Build the admin router, mounted under `/admin`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index).post(products::create))
        .route(
            "/products/{id}",
            put(products::update).delete(products::destroy),
        )
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/orders/{id}/status", put(orders::set_status))
        .route("/reviews", get(reviews::index))
        .route("/reviews/{id}/status", put(reviews::set_status))
        .route("/reviews/{id}", delete(reviews::destroy))
        .route("/banners", get(banners::index).post(banners::create))
        .route(
            "/banners/{id}",
            put(banners::update).delete(banners::destroy),
        )
        .route("/users", get(users::index))
}
