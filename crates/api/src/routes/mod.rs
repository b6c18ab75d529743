//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (pings MongoDB)
//!
//! # Auth
//! POST /user/auth/signup                - Create account, email OTP
//! POST /user/auth/login                 - Password login, sets cookie
//! POST /user/auth/logout                - Clear cookie
//! POST /user/auth/otp/verify            - Confirm signup code
//! POST /user/auth/otp/resend            - Re-email signup code
//! POST /user/auth/password/forgot       - Email reset code
//! POST /user/auth/password/reset        - Set new password with code
//!
//! # Account (requires auth)
//! GET  /user/profile                    - Current account
//! GET  /user/addresses                  - Address list
//! POST /user/addresses                  - Add address
//! PUT  /user/addresses/{id}             - Update address
//! DELETE /user/addresses/{id}           - Remove address
//!
//! # Catalog (public)
//! GET  /user/products                   - Listing with filters
//! GET  /user/products/{id}              - Product detail
//! GET  /user/products/{id}/reviews      - Approved reviews
//! GET  /user/banners                    - Active banners
//!
//! # Cart (requires auth)
//! GET  /user/cart                       - Populated cart
//! POST /user/cart/items                 - Add line (409 if already present)
//! PUT  /user/cart/items/{product_id}    - Set quantity
//! DELETE /user/cart/items/{product_id}  - Remove line
//!
//! # Wishlist (requires auth)
//! GET  /user/wishlist                   - Snapshot list
//! POST /user/wishlist/items             - Add snapshot
//! DELETE /user/wishlist/items/{product_id} - Remove (404 if absent)
//!
//! # Orders (requires auth)
//! POST /user/orders                     - Gateway order + unsaved draft
//! POST /user/orders/verify              - Verify signature, persist order
//! GET  /user/orders                     - Own orders, newest first
//! POST /user/reviews                    - Submit review (starts pending)
//!
//! # Admin (requires admin)
//! /admin/products, /admin/orders, /admin/reviews, /admin/banners, /admin/users
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod banners;
pub mod cart;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod wishlist;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/otp/verify", post(auth::verify_otp))
        .route("/otp/resend", post(auth::resend_otp))
        .route("/password/forgot", post(auth::forgot_password))
        .route("/password/reset", post(auth::reset_password))
}

/// Create the user-facing routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        // Account
        .route("/profile", get(account::profile))
        .route(
            "/addresses",
            get(account::list_addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        // Catalog
        .route("/products", get(products::index))
        .route("/products/{id}", get(products::show))
        .route("/products/{id}/reviews", get(reviews::list_for_product))
        .route("/banners", get(banners::index))
        // Cart
        .route("/cart", get(cart::show))
        .route("/cart/items", post(cart::add))
        .route(
            "/cart/items/{product_id}",
            put(cart::update).delete(cart::remove),
        )
        // Wishlist
        .route("/wishlist", get(wishlist::show))
        .route("/wishlist/items", post(wishlist::add))
        .route("/wishlist/items/{product_id}", delete(wishlist::remove))
        // Orders & reviews
        .route("/orders", get(orders::index).post(orders::create))
        .route("/orders/verify", post(orders::verify))
        .route("/reviews", post(reviews::create))
}

/// Create all routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/user", user_routes())
        .nest("/admin", admin::router())
}
