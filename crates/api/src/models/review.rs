//! Product review document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::{ProductId, ReviewId, ReviewStatus, UserId};

/// A customer review (`reviews` collection).
///
/// Reviews start out pending and only show on the storefront once an admin
/// approves them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    pub user_id: UserId,
    pub product_id: ProductId,
    /// 1 through 5.
    pub rating: u8,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ReviewStatus,
    pub created_at: DateTime,
}

impl Review {
    /// Lowest and highest accepted ratings.
    pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;
}
