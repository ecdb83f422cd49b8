//! # ac-media-s3
//!
//! Blob-store implementation of [`MediaStore`] over an S3-compatible
//! service. Uploads are first fitted into the site's 1200x800 bounding box
//! (aspect preserved, never upscaled), then written under a managed key
//! prefix; the object key doubles as the descriptor's `public_id`.

use std::io::Cursor;
use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::Utc;
use image::ImageReader;
use uuid::Uuid;

use ac_core::models::CoverImage;
use ac_core::traits::MediaStore;

const MAX_WIDTH: u32 = 1200;
const MAX_HEIGHT: u32 = 800;

pub struct S3MediaStore {
    client: Client,
    bucket: String,
    /// Managed folder inside the bucket (e.g., "assets").
    key_prefix: String,
    /// Base URL the bucket is served from.
    public_base_url: String,
}

impl S3MediaStore {
    pub fn new(client: Client, bucket: String, key_prefix: String, public_base_url: String) -> Self {
        Self {
            client,
            bucket,
            key_prefix: key_prefix.trim_matches('/').to_string(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("jpg")
        .to_ascii_lowercase()
}

fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Fits an image into the bounding box, preserving aspect ratio. Images
/// already inside the box pass through byte-for-byte.
fn fit_within_bounds(data: Vec<u8>, max_width: u32, max_height: u32) -> anyhow::Result<Vec<u8>> {
    let reader = ImageReader::new(Cursor::new(&data)).with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode()?;

    if img.width() <= max_width && img.height() <= max_height {
        return Ok(data);
    }

    let resized = img.resize(max_width, max_height, image::imageops::FilterType::Triangle);
    let mut out = Cursor::new(Vec::new());
    resized.write_to(&mut out, format.unwrap_or(image::ImageFormat::Jpeg))?;
    Ok(out.into_inner())
}

#[async_trait]
impl MediaStore for S3MediaStore {
    async fn store(&self, data: Vec<u8>, original_name: &str) -> anyhow::Result<CoverImage> {
        let ext = extension_of(original_name);
        let processed = fit_within_bounds(data, MAX_WIDTH, MAX_HEIGHT)?;

        let key = format!(
            "{}/{}-{}.{}",
            self.key_prefix,
            Utc::now().timestamp_millis(),
            Uuid::new_v4(),
            ext
        );
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type_for(&ext))
            .body(ByteStream::from(processed))
            .send()
            .await?;

        Ok(CoverImage {
            url: format!("{}/{}", self.public_base_url, key),
            public_id: key,
        })
    }

    async fn destroy(&self, public_id: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(public_id)
            .send()
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn small_images_pass_through_unchanged() {
        let original = png_bytes(640, 480);
        let processed = fit_within_bounds(original.clone(), MAX_WIDTH, MAX_HEIGHT).unwrap();
        assert_eq!(processed, original);
    }

    #[test]
    fn oversized_images_shrink_into_the_box() {
        let processed = fit_within_bounds(png_bytes(2400, 1000), MAX_WIDTH, MAX_HEIGHT).unwrap();
        let img = image::load_from_memory(&processed).unwrap();
        assert!(img.width() <= MAX_WIDTH);
        assert!(img.height() <= MAX_HEIGHT);
        // Aspect ratio preserved: 2400x1000 fits at 1200x500.
        assert_eq!((img.width(), img.height()), (1200, 500));
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        assert!(fit_within_bounds(vec![0u8; 32], MAX_WIDTH, MAX_HEIGHT).is_err());
    }
}
