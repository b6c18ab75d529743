//! Account and address route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tarini_core::AddressId;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::user::Address;
use crate::response::ApiMessage;
use crate::state::AppState;

use super::auth::UserView;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Address fields as submitted by the client.
#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub full_name: String,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl AddressInput {
    /// Materialize with a fresh id.
    pub(crate) fn into_address(self) -> Address {
        self.into_address_with_id(AddressId::generate())
    }

    pub(crate) fn into_address_with_id(self, id: AddressId) -> Address {
        Address {
            id,
            full_name: self.full_name,
            line1: self.line1,
            line2: self.line2,
            city: self.city,
            state: self.state,
            pincode: self.pincode,
            phone: self.phone,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AddressView {
    pub id: String,
    pub full_name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

impl From<&Address> for AddressView {
    fn from(address: &Address) -> Self {
        Self {
            id: address.id.to_string(),
            full_name: address.full_name.clone(),
            line1: address.line1.clone(),
            line2: address.line2.clone(),
            city: address.city.clone(),
            state: address.state.clone(),
            pincode: address.pincode.clone(),
            phone: address.phone.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct AddressesResponse {
    pub success: bool,
    pub addresses: Vec<AddressView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /user/profile - the authenticated account.
#[instrument(skip_all)]
pub async fn profile(RequireUser(user): RequireUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        success: true,
        user: UserView::from(&user),
    })
}

/// GET /user/addresses - the embedded address list.
#[instrument(skip_all)]
pub async fn list_addresses(RequireUser(user): RequireUser) -> Json<AddressesResponse> {
    Json(AddressesResponse {
        success: true,
        addresses: user.addresses.iter().map(AddressView::from).collect(),
    })
}

/// POST /user/addresses - append a new address.
#[instrument(skip(state, user, form))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<AddressInput>,
) -> Result<Json<AddressesResponse>> {
    let address = form.into_address();
    UserRepository::new(state.db())
        .add_address(user.id, &address)
        .await?;

    let mut addresses = user.addresses;
    addresses.push(address);

    Ok(Json(AddressesResponse {
        success: true,
        addresses: addresses.iter().map(AddressView::from).collect(),
    }))
}

/// PUT /user/addresses/{id} - replace an address in place.
#[instrument(skip(state, user, form))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
    Json(form): Json<AddressInput>,
) -> Result<Json<ApiMessage>> {
    let address_id = parse_address_id(&id)?;
    if user.address(address_id).is_none() {
        return Err(ApiError::NotFound("address not found".to_owned()));
    }

    let address = form.into_address_with_id(address_id);
    UserRepository::new(state.db())
        .update_address(user.id, &address)
        .await
        .map_err(not_found_as_missing_address)?;

    Ok(Json(ApiMessage::ok("address updated")))
}

/// DELETE /user/addresses/{id} - remove an address.
#[instrument(skip(state, user))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    let address_id = parse_address_id(&id)?;
    UserRepository::new(state.db())
        .delete_address(user.id, address_id)
        .await
        .map_err(not_found_as_missing_address)?;

    Ok(Json(ApiMessage::ok("address removed")))
}

fn parse_address_id(raw: &str) -> Result<AddressId> {
    AddressId::parse(raw).map_err(|_| ApiError::BadRequest("invalid address id".to_owned()))
}

fn not_found_as_missing_address(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound("address not found".to_owned()),
        other => ApiError::Database(other),
    }
}
