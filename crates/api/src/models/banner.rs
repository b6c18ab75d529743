//! Promotional banner document.

use bson::DateTime;
use serde::{Deserialize, Serialize};

use tarini_core::BannerId;

/// A storefront banner (`banners` collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    #[serde(rename = "_id")]
    pub id: BannerId,
    pub title: String,
    pub image_url: String,
    /// Where the banner points, if anywhere.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub active: bool,
    /// Sort key on the home page; lower renders first.
    pub position: i32,
    pub created_at: DateTime,
}
