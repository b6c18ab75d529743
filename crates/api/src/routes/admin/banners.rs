//! Admin banner CRUD.

use axum::{
    Json,
    extract::{Path, State},
};
use bson::DateTime;
use serde::Deserialize;
use tracing::instrument;

use tarini_core::BannerId;

use crate::db::{BannerRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::models::Banner;
use crate::response::ApiMessage;
use crate::routes::banners::{BannerView, BannersResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BannerInput {
    pub title: String,
    pub image_url: String,
    pub link: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub position: i32,
}

const fn default_active() -> bool {
    true
}

impl BannerInput {
    fn into_banner(self, id: BannerId, created_at: DateTime) -> Banner {
        Banner {
            id,
            title: self.title,
            image_url: self.image_url,
            link: self.link,
            active: self.active,
            position: self.position,
            created_at,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.image_url.trim().is_empty() {
            return Err(ApiError::BadRequest("image_url is required".to_owned()));
        }
        Ok(())
    }
}

#[derive(Debug, serde::Serialize)]
pub struct BannerResponse {
    pub success: bool,
    pub banner: BannerView,
}

/// GET /admin/banners - every banner, active or not.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<BannersResponse>> {
    let banners = BannerRepository::new(state.db()).list_all().await?;

    Ok(Json(BannersResponse {
        success: true,
        banners: banners.iter().map(BannerView::from).collect(),
    }))
}

/// POST /admin/banners - add a banner.
#[instrument(skip(state, _admin, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(form): Json<BannerInput>,
) -> Result<Json<BannerResponse>> {
    form.validate()?;

    let banner = form.into_banner(BannerId::generate(), DateTime::now());
    BannerRepository::new(state.db()).insert(&banner).await?;

    Ok(Json(BannerResponse {
        success: true,
        banner: BannerView::from(&banner),
    }))
}

/// PUT /admin/banners/{id} - replace a banner's fields.
#[instrument(skip(state, _admin, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(form): Json<BannerInput>,
) -> Result<Json<BannerResponse>> {
    form.validate()?;

    let banner_id = parse_banner_id(&id)?;
    let repo = BannerRepository::new(state.db());

    let existing = repo
        .list_all()
        .await?
        .into_iter()
        .find(|b| b.id == banner_id)
        .ok_or_else(|| ApiError::NotFound("banner not found".to_owned()))?;

    let banner = form.into_banner(banner_id, existing.created_at);
    repo.update(&banner).await?;

    Ok(Json(BannerResponse {
        success: true,
        banner: BannerView::from(&banner),
    }))
}

/// DELETE /admin/banners/{id} - remove a banner.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    let banner_id = parse_banner_id(&id)?;
    BannerRepository::new(state.db())
        .delete(banner_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => ApiError::NotFound("banner not found".to_owned()),
            other => ApiError::Database(other),
        })?;

    Ok(Json(ApiMessage::ok("banner deleted")))
}

fn parse_banner_id(raw: &str) -> Result<BannerId> {
    BannerId::parse(raw).map_err(|_| ApiError::BadRequest("invalid banner id".to_owned()))
}
