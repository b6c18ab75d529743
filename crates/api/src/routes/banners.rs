//! Public banner route handlers.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::BannerRepository;
use crate::error::Result;
use crate::models::Banner;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BannerView {
    pub id: String,
    pub title: String,
    pub image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub active: bool,
    pub position: i32,
}

impl From<&Banner> for BannerView {
    fn from(banner: &Banner) -> Self {
        Self {
            id: banner.id.to_string(),
            title: banner.title.clone(),
            image_url: banner.image_url.clone(),
            link: banner.link.clone(),
            active: banner.active,
            position: banner.position,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BannersResponse {
    pub success: bool,
    pub banners: Vec<BannerView>,
}

/// GET /user/banners - active banners in display order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<BannersResponse>> {
    let banners = BannerRepository::new(state.db()).list_active().await?;

    Ok(Json(BannersResponse {
        success: true,
        banners: banners.iter().map(BannerView::from).collect(),
    }))
}
