//! Admin review moderation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use tarini_core::ReviewStatus;

use crate::db::{RepositoryError, ReviewRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::response::ApiMessage;
use crate::routes::reviews::{ReviewView, ReviewsResponse, parse_review_id};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetReviewStatusRequest {
    pub status: ReviewStatus,
}

/// GET /admin/reviews - the moderation queue, newest first.
#[instrument(skip(state, _admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ReviewsResponse>> {
    let reviews = ReviewRepository::new(state.db()).list_all().await?;

    Ok(Json(ReviewsResponse {
        success: true,
        reviews: reviews.iter().map(ReviewView::from).collect(),
    }))
}

/// PUT /admin/reviews/{id}/status - approve or reject a review.
#[instrument(skip(state, _admin))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
    Json(form): Json<SetReviewStatusRequest>,
) -> Result<Json<ApiMessage>> {
    let review_id = parse_review_id(&id)?;
    ReviewRepository::new(state.db())
        .set_status(review_id, form.status)
        .await
        .map_err(missing_review)?;

    Ok(Json(ApiMessage::ok("review status updated")))
}

/// DELETE /admin/reviews/{id} - drop a review entirely.
#[instrument(skip(state, _admin))]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<ApiMessage>> {
    let review_id = parse_review_id(&id)?;
    ReviewRepository::new(state.db())
        .delete(review_id)
        .await
        .map_err(missing_review)?;

    Ok(Json(ApiMessage::ok("review deleted")))
}

fn missing_review(err: RepositoryError) -> ApiError {
    match err {
        RepositoryError::NotFound => ApiError::NotFound("review not found".to_owned()),
        other => ApiError::Database(other),
    }
}
