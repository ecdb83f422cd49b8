//! # ac-media-local
//!
//! Local filesystem implementation of [`MediaStore`]. Files land in one
//! managed directory under a collision-resistant timestamped name; the
//! filename doubles as the descriptor's `public_id`.

use std::path::{Path, PathBuf};

use anyhow::bail;
use async_trait::async_trait;
use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use ac_core::models::CoverImage;
use ac_core::traits::MediaStore;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/uploads")
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("bin")
        .to_ascii_lowercase()
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn store(&self, data: Vec<u8>, original_name: &str) -> anyhow::Result<CoverImage> {
        fs::create_dir_all(&self.root_path).await?;

        let filename = format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            extension_of(original_name)
        );
        fs::write(self.root_path.join(&filename), &data).await?;

        Ok(CoverImage {
            url: format!("{}/{}", self.url_prefix, filename),
            public_id: filename,
        })
    }

    async fn destroy(&self, public_id: &str) -> anyhow::Result<()> {
        // public_id is a bare filename; anything path-like is not ours.
        if public_id.is_empty() || public_id.contains('/') || public_id.contains('\\') {
            bail!("invalid media id: {public_id}");
        }
        fs::remove_file(self.root_path.join(public_id)).await?;
        Ok(())
    }
}
