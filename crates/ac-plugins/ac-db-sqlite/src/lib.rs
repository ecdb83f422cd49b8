//! # ac-db-sqlite
//!
//! SQLite implementation of [`CmsRepo`] over a bounded sqlx pool. Maps the
//! relational rows onto the `ac-core` domain models; every cover/image
//! column is read through the tolerant decoder and written back in the
//! canonical shape.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use ac_core::cover::{decode_cover, encode_cover, encode_image};
use ac_core::models::{
    AdminProfileUpdate, Administrator, CoverImage, NewAdministrator, NewNewsPost, NewPaintingPost,
    NewShopItem, NewsPost, PaintingPost, PartnerBrand, ShopItem,
};
use ac_core::traits::CmsRepo;

const SCHEMA: &str = include_str!("schema.sql");

pub struct SqliteCmsRepo {
    pool: SqlitePool,
}

impl SqliteCmsRepo {
    /// Connects with the default pool bound (5 connections) and bootstraps
    /// the schema.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        Self::with_max_connections(url, 5).await
    }

    pub async fn with_max_connections(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// A single-connection in-memory database. An in-memory SQLite exists
    /// per connection, so the pool must never open a second one or recycle
    /// the first.
    pub async fn in_memory() -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        sqlx::raw_sql(SCHEMA).execute(&pool).await?;
        Ok(Self { pool })
    }

    /// Closes the pool; called after the HTTP server has drained.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn map_admin(row: &SqliteRow) -> Administrator {
    Administrator {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        role: row.get("role"),
        pin_hash: row.get("pin_hash"),
    }
}

fn map_news(row: &SqliteRow, author_name: Option<String>) -> NewsPost {
    NewsPost {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        published_at: row.get("published_at"),
        link: row.get("link"),
        author_id: row.get("author_id"),
        cover: decode_cover(&row.get::<String, _>("cover")),
        author_name,
    }
}

fn map_painting(row: &SqliteRow) -> PaintingPost {
    PaintingPost {
        id: row.get("id"),
        title: row.get("title"),
        body: row.get("body"),
        published_at: row.get("published_at"),
        link: row.get("link"),
        author_id: row.get("author_id"),
        cover: decode_cover(&row.get::<String, _>("cover")),
    }
}

fn map_shop_item(row: &SqliteRow) -> ShopItem {
    ShopItem {
        id: row.get("id"),
        name: row.get("name"),
        body: row.get("body"),
        price: row.get("price"),
        author_id: row.get("author_id"),
        cover: decode_cover(&row.get::<String, _>("cover")),
    }
}

fn map_partner(row: &SqliteRow) -> PartnerBrand {
    PartnerBrand {
        id: row.get("id"),
        name: row.get("name"),
        image: decode_cover(&row.get::<String, _>("image"))
            .into_iter()
            .next()
            .unwrap_or_default(),
    }
}

#[async_trait]
impl CmsRepo for SqliteCmsRepo {
    async fn list_admins(&self) -> anyhow::Result<Vec<Administrator>> {
        let rows = sqlx::query("SELECT * FROM administrators")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_admin).collect())
    }

    async fn find_admin(&self, id: i64) -> anyhow::Result<Option<Administrator>> {
        let row = sqlx::query("SELECT * FROM administrators WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_admin))
    }

    async fn find_admin_by_email(&self, email: &str) -> anyhow::Result<Option<Administrator>> {
        let row = sqlx::query("SELECT * FROM administrators WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_admin))
    }

    async fn admin_exists(&self, name: &str, email: &str) -> anyhow::Result<bool> {
        let row = sqlx::query("SELECT 1 FROM administrators WHERE name = ? OR email = ? LIMIT 1")
            .bind(name)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn create_admin(&self, admin: NewAdministrator) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO administrators (name, email, password_hash, role, pin_hash) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.role)
        .bind(&admin.pin_hash)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_admin_profile(&self, id: i64, update: AdminProfileUpdate) -> anyhow::Result<bool> {
        let result = sqlx::query(
            "UPDATE administrators SET name = ?, email = ?, role = ?, pin_hash = ? WHERE id = ?",
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.role)
        .bind(&update.pin_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn update_admin_password(&self, email: &str, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE administrators SET password_hash = ? WHERE email = ?")
            .bind(password_hash)
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_admin(&self, id: i64) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM administrators WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_news(&self) -> anyhow::Result<Vec<NewsPost>> {
        let rows = sqlx::query(
            "SELECT n.id, n.title, n.body, n.published_at, n.link, n.author_id, n.cover, \
                    a.name AS author_name \
             FROM news_posts n \
             LEFT JOIN administrators a ON n.author_id = a.id \
             ORDER BY n.published_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .iter()
            .map(|row| map_news(row, row.get("author_name")))
            .collect())
    }

    async fn find_news(&self, id: i64) -> anyhow::Result<Option<NewsPost>> {
        let row = sqlx::query("SELECT * FROM news_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(|row| map_news(row, None)))
    }

    async fn create_news(&self, post: NewNewsPost) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO news_posts (title, body, published_at, link, author_id, cover) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(Utc::now())
        .bind(&post.link)
        .bind(post.author_id)
        .bind(encode_cover(&post.cover))
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Reads the current cover and writes the row in one transaction so a
    /// concurrent replace cannot interleave between the two statements.
    async fn update_news(
        &self,
        id: i64,
        title: &str,
        body: &str,
        link: Option<&str>,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM news_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));

        match new_cover {
            Some(cover) => {
                sqlx::query(
                    "UPDATE news_posts SET title = ?, body = ?, link = ?, cover = ? WHERE id = ?",
                )
                .bind(title)
                .bind(body)
                .bind(link)
                .bind(encode_cover(cover))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            // No new images: leave the stored cover byte-for-byte untouched.
            None => {
                sqlx::query("UPDATE news_posts SET title = ?, body = ?, link = ? WHERE id = ?")
                    .bind(title)
                    .bind(body)
                    .bind(link)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn delete_news(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM news_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));
        sqlx::query("DELETE FROM news_posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn list_paintings(&self) -> anyhow::Result<Vec<PaintingPost>> {
        let rows = sqlx::query("SELECT * FROM painting_posts ORDER BY published_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_painting).collect())
    }

    async fn find_painting(&self, id: i64) -> anyhow::Result<Option<PaintingPost>> {
        let row = sqlx::query("SELECT * FROM painting_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_painting))
    }

    async fn create_painting(&self, post: NewPaintingPost) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO painting_posts (title, body, published_at, link, author_id, cover) \
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&post.title)
        .bind(&post.body)
        .bind(Utc::now())
        .bind(&post.link)
        .bind(post.author_id)
        .bind(encode_cover(&post.cover))
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_painting(
        &self,
        id: i64,
        title: &str,
        body: &str,
        link: Option<&str>,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM painting_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));

        match new_cover {
            Some(cover) => {
                sqlx::query(
                    "UPDATE painting_posts SET title = ?, body = ?, link = ?, cover = ? WHERE id = ?",
                )
                .bind(title)
                .bind(body)
                .bind(link)
                .bind(encode_cover(cover))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("UPDATE painting_posts SET title = ?, body = ?, link = ? WHERE id = ?")
                    .bind(title)
                    .bind(body)
                    .bind(link)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn delete_painting(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM painting_posts WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));
        sqlx::query("DELETE FROM painting_posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn list_shop_items(&self) -> anyhow::Result<Vec<ShopItem>> {
        let rows = sqlx::query("SELECT * FROM shop_items")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_shop_item).collect())
    }

    async fn find_shop_item(&self, id: i64) -> anyhow::Result<Option<ShopItem>> {
        let row = sqlx::query("SELECT * FROM shop_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(map_shop_item))
    }

    async fn create_shop_item(&self, item: NewShopItem) -> anyhow::Result<i64> {
        let result = sqlx::query(
            "INSERT INTO shop_items (name, body, price, author_id, cover) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&item.name)
        .bind(&item.body)
        .bind(item.price)
        .bind(item.author_id)
        .bind(encode_cover(&item.cover))
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_shop_item(
        &self,
        id: i64,
        name: &str,
        body: &str,
        price: f64,
        new_cover: Option<&[CoverImage]>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM shop_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));

        match new_cover {
            Some(cover) => {
                sqlx::query(
                    "UPDATE shop_items SET name = ?, body = ?, price = ?, cover = ? WHERE id = ?",
                )
                .bind(name)
                .bind(body)
                .bind(price)
                .bind(encode_cover(cover))
                .bind(id)
                .execute(&mut *tx)
                .await?;
            }
            None => {
                sqlx::query("UPDATE shop_items SET name = ?, body = ?, price = ? WHERE id = ?")
                    .bind(name)
                    .bind(body)
                    .bind(price)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn delete_shop_item(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT cover FROM shop_items WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("cover"));
        sqlx::query("DELETE FROM shop_items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(old))
    }

    async fn list_partners(&self) -> anyhow::Result<Vec<PartnerBrand>> {
        let rows = sqlx::query("SELECT * FROM partner_brands")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(map_partner).collect())
    }

    async fn create_partner(&self, name: &str, image: &CoverImage) -> anyhow::Result<i64> {
        let result = sqlx::query("INSERT INTO partner_brands (name, image) VALUES (?, ?)")
            .bind(name)
            .bind(encode_image(image))
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_partner(
        &self,
        id: i64,
        name: Option<&str>,
        image: Option<&CoverImage>,
    ) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT image FROM partner_brands WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("image"));

        // Assemble the column list from whichever fields arrived.
        let mut columns = Vec::new();
        if name.is_some() {
            columns.push("name = ?");
        }
        if image.is_some() {
            columns.push("image = ?");
        }
        if columns.is_empty() {
            return Ok(Some(Vec::new()));
        }
        let sql = format!("UPDATE partner_brands SET {} WHERE id = ?", columns.join(", "));
        let mut query = sqlx::query(&sql);
        if let Some(name) = name {
            query = query.bind(name);
        }
        let encoded;
        if let Some(image) = image {
            encoded = encode_image(image);
            query = query.bind(&encoded);
        }
        query.bind(id).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(Some(if image.is_some() { old } else { Vec::new() }))
    }

    async fn delete_partner(&self, id: i64) -> anyhow::Result<Option<Vec<CoverImage>>> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query("SELECT image FROM partner_brands WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        let old = decode_cover(&row.get::<String, _>("image"));
        sqlx::query("DELETE FROM partner_brands WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(Some(old))
    }
}
