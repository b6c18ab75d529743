//! Review route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use bson::DateTime;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use tarini_core::{ReviewId, ReviewStatus};

use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{ApiError, Result};
use crate::middleware::RequireUser;
use crate::models::Review;
use crate::state::AppState;

use super::products::parse_product_id;

// =============================================================================
// Request / Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateReviewRequest {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewView {
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    pub images: Vec<String>,
    pub status: ReviewStatus,
    pub created_at: String,
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id.to_string(),
            user_id: review.user_id.to_string(),
            product_id: review.product_id.to_string(),
            rating: review.rating,
            comment: review.comment.clone(),
            images: review.images.clone(),
            status: review.status,
            created_at: review
                .created_at
                .try_to_rfc3339_string()
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewsResponse {
    pub success: bool,
    pub reviews: Vec<ReviewView>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub success: bool,
    pub review: ReviewView,
}

// =============================================================================
// Handlers
// =============================================================================

/// POST /user/reviews - submit a review; it stays hidden until approved.
#[instrument(skip(state, user, form), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(form): Json<CreateReviewRequest>,
) -> Result<Json<ReviewResponse>> {
    if !Review::RATING_RANGE.contains(&form.rating) {
        return Err(ApiError::BadRequest(
            "rating must be between 1 and 5".to_owned(),
        ));
    }

    let product_id = parse_product_id(&form.product_id)?;
    ProductRepository::new(state.db())
        .get(product_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("product not found".to_owned()))?;

    let review = Review {
        id: ReviewId::generate(),
        user_id: user.id,
        product_id,
        rating: form.rating,
        comment: form.comment,
        images: form.images,
        status: ReviewStatus::Pending,
        created_at: DateTime::now(),
    };

    ReviewRepository::new(state.db()).insert(&review).await?;

    Ok(Json(ReviewResponse {
        success: true,
        review: ReviewView::from(&review),
    }))
}

/// GET /user/products/{id}/reviews - approved reviews for a product.
#[instrument(skip(state))]
pub async fn list_for_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewsResponse>> {
    let product_id = parse_product_id(&id)?;
    let reviews = ReviewRepository::new(state.db())
        .list_approved_for_product(product_id)
        .await?;

    Ok(Json(ReviewsResponse {
        success: true,
        reviews: reviews.iter().map(ReviewView::from).collect(),
    }))
}

pub(crate) fn parse_review_id(raw: &str) -> Result<ReviewId> {
    ReviewId::parse(raw).map_err(|_| ApiError::BadRequest("invalid review id".to_owned()))
}
