//! Admin user listing.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::UserRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::User;
use crate::state::AppState;

/// Account as shown in the admin dashboard; no credential material.
#[derive(Debug, Serialize)]
pub struct AdminUserView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub verified: bool,
    pub is_admin: bool,
    pub order_count: usize,
    pub created_at: String,
}

impl From<&User> for AdminUserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.to_string(),
            verified: user.verified,
            is_admin: user.is_admin,
            order_count: user.order_ids.len(),
            created_at: user
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminUsersResponse {
    pub success: bool,
    pub users: Vec<AdminUserView>,
}

/// GET /admin/users - every account, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<AdminUsersResponse>> {
    let users = UserRepository::new(state.db()).list().await?;

    Ok(Json(AdminUsersResponse {
        success: true,
        users: users.iter().map(AdminUserView::from).collect(),
    }))
}
