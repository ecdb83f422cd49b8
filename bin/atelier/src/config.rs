//! Environment-driven configuration. `.env` is honored for local runs;
//! every key has a development default except the S3 coordinates.

use anyhow::Context;

pub struct AppConfig {
    pub bind_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    /// The one browser origin CORS admits.
    pub allowed_origin: String,
    /// Author recorded when a create request does not name one.
    pub default_author_id: i64,
    pub upload_dir: String,
    pub upload_url_prefix: String,
    #[cfg(feature = "media-s3")]
    pub s3: S3Config,
}

#[cfg(feature = "media-s3")]
pub struct S3Config {
    pub bucket: String,
    pub key_prefix: String,
    pub public_base_url: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            bind_addr: env_or("ATELIER_BIND_ADDR", "127.0.0.1:8080"),
            database_url: env_or("ATELIER_DATABASE_URL", "sqlite:atelier.db"),
            db_max_connections: env_or("ATELIER_DB_MAX_CONNECTIONS", "5")
                .parse()
                .context("ATELIER_DB_MAX_CONNECTIONS must be a number")?,
            allowed_origin: env_or("ATELIER_ALLOWED_ORIGIN", "http://localhost:5173"),
            default_author_id: env_or("ATELIER_DEFAULT_AUTHOR_ID", "1")
                .parse()
                .context("ATELIER_DEFAULT_AUTHOR_ID must be a number")?,
            upload_dir: env_or("ATELIER_UPLOAD_DIR", "./data/uploads"),
            upload_url_prefix: env_or("ATELIER_UPLOAD_URL_PREFIX", "/uploads"),
            #[cfg(feature = "media-s3")]
            s3: S3Config {
                bucket: std::env::var("ATELIER_S3_BUCKET")
                    .context("ATELIER_S3_BUCKET is required with the media-s3 feature")?,
                key_prefix: env_or("ATELIER_S3_KEY_PREFIX", "assets"),
                public_base_url: std::env::var("ATELIER_S3_PUBLIC_BASE_URL")
                    .context("ATELIER_S3_PUBLIC_BASE_URL is required with the media-s3 feature")?,
            },
        })
    }
}
