//! # Domain Models
//!
//! These structs represent the rows the studio site is built from. All of
//! them are owned by the database; the process keeps no authoritative state
//! between requests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored image: the public URL and the opaque identifier the media
/// store deletes by.
///
/// Both fields default to empty because historical rows carry partial
/// shapes (bare `{public_id}` objects, plain filenames). An empty
/// `public_id` is skipped by cleanup, matching how those rows have always
/// behaved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub public_id: String,
}

/// A staff account. Credential material is argon2 PHC strings and never
/// serializes into a response.
#[derive(Debug, Clone, Serialize)]
pub struct Administrator {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    #[serde(skip_serializing)]
    pub pin_hash: String,
}

/// Input for registration; hashes are produced by the handler before the
/// repository ever sees them.
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub pin_hash: String,
}

/// Profile fields an administrator may edit after registration.
#[derive(Debug, Clone)]
pub struct AdminProfileUpdate {
    pub name: String,
    pub email: String,
    pub role: String,
    pub pin_hash: String,
}

/// A news post on the studio's front page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsPost {
    pub id: i64,
    pub title: String,
    pub body: String,
    /// Server-assigned at creation; lists are ordered by this, newest first.
    pub published_at: DateTime<Utc>,
    pub link: Option<String>,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
    /// Display name of the authoring administrator, denormalized on list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewNewsPost {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
}

/// A post in the painting-news section. Same lifecycle as [`NewsPost`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaintingPost {
    pub id: i64,
    pub title: String,
    pub body: String,
    pub published_at: DateTime<Utc>,
    pub link: Option<String>,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
}

#[derive(Debug, Clone)]
pub struct NewPaintingPost {
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
}

/// An item in the studio's shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: i64,
    pub name: String,
    pub body: String,
    pub price: f64,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
}

#[derive(Debug, Clone)]
pub struct NewShopItem {
    pub name: String,
    pub body: String,
    pub price: f64,
    pub author_id: i64,
    pub cover: Vec<CoverImage>,
}

/// A partner/ally brand shown on the site. Exactly one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartnerBrand {
    pub id: i64,
    pub name: String,
    pub image: CoverImage,
}
