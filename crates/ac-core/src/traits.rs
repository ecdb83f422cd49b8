//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be wired into the binary.

use async_trait::async_trait;

use crate::models::{
    AdminProfileUpdate, Administrator, CoverImage, NewAdministrator, NewNewsPost, NewPaintingPost,
    NewShopItem, NewsPost, PaintingPost, PartnerBrand, ShopItem,
};

/// Data persistence contract for every resource the site manages.
///
/// Mutations that supersede stored images return the previous cover so the
/// caller can run compensating deletion against the media store; `None`
/// means the identifier had no matching row.
#[async_trait]
pub trait CmsRepo: Send + Sync {
    // Administrator operations
    async fn list_admins(&self) -> anyhow::Result<Vec<Administrator>>;
    async fn find_admin(&self, id: i64) -> anyhow::Result<Option<Administrator>>;
    async fn find_admin_by_email(&self, email: &str) -> anyhow::Result<Option<Administrator>>;
    /// True when the name or the email is already taken.
    async fn admin_exists(&self, name: &str, email: &str) -> anyhow::Result<bool>;
    async fn create_admin(&self, admin: NewAdministrator) -> anyhow::Result<i64>;
    /// Returns false when the identifier had no matching row.
    async fn update_admin_profile(&self, id: i64, update: AdminProfileUpdate) -> anyhow::Result<bool>;
    async fn update_admin_password(&self, email: &str, password_hash: &str) -> anyhow::Result<()>;
    async fn delete_admin(&self, id: i64) -> anyhow::Result<()>;

    // News operations
    async fn list_news(&self) -> anyhow::Result<Vec<NewsPost>>;
    async fn find_news(&self, id: i64) -> anyhow::Result<Option<NewsPost>>;
    async fn create_news(&self, post: NewNewsPost) -> anyhow::Result<i64>;
    /// Updates the textual fields and, when `new_cover` is set, replaces the
    /// whole stored image array. Returns the cover as it was before the
    /// write.
    async fn update_news(
        &self,
        id: i64,
        title: &str,
        body: &str,
        link: Option<&str>,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>>;
    /// Deletes the row and returns the cover it held.
    async fn delete_news(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>>;

    // Painting-news operations
    async fn list_paintings(&self) -> anyhow::Result<Vec<PaintingPost>>;
    async fn find_painting(&self, id: i64) -> anyhow::Result<Option<PaintingPost>>;
    async fn create_painting(&self, post: NewPaintingPost) -> anyhow::Result<i64>;
    async fn update_painting(
        &self,
        id: i64,
        title: &str,
        body: &str,
        link: Option<&str>,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>>;
    async fn delete_painting(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>>;

    // Shop operations
    async fn list_shop_items(&self) -> anyhow::Result<Vec<ShopItem>>;
    async fn find_shop_item(&self, id: i64) -> anyhow::Result<Option<ShopItem>>;
    async fn create_shop_item(&self, item: NewShopItem) -> anyhow::Result<i64>;
    async fn update_shop_item(
        &self,
        id: i64,
        name: &str,
        body: &str,
        price: f64,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>>;
    async fn delete_shop_item(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>>;

    // Partner brand operations
    async fn list_partners(&self) -> anyhow::Result<Vec<PartnerBrand>>;
    async fn create_partner(&self, name: &str, image: &CoverImage) -> anyhow::Result<i64>;
    /// Partial update: name only, image only, or both; the dynamically
    /// assembled column list mirrors whichever arguments are set. Returns
    /// the superseded image (empty when the image was not replaced).
    async fn update_partner(
        &self,
        id: i64,
        name: Option<&str>,
        image: Option<&CoverImage>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>>;
    async fn delete_partner(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>>;
}

/// Media storage contract: upload bytes, get back a descriptor; destroy by
/// the descriptor's opaque identifier.
///
/// A successful `store` means the bytes exist in the target store even if a
/// subsequent database write fails — callers own the compensating deletion.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn store(&self, data: Vec<u8>, original_name: &str) -> anyhow::Result<CoverImage>;
    async fn destroy(&self, public_id: &str) -> anyhow::Result<()>;
}

/// One-way credential hashing contract (passwords and security PINs).
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, secret: &str) -> anyhow::Result<String>;
    /// Verification failure and malformed stored hashes both return false.
    fn verify(&self, secret: &str, hash: &str) -> bool;
}
