//! # Image lifecycle helpers
//!
//! Uploading a batch and tearing one down are the two halves every mutating
//! handler shares. Deletion is compensating work: each image is attempted
//! independently, failures are logged and swallowed, and the primary
//! response never waits on a retry.

use futures_util::future::join_all;

use ac_core::models::CoverImage;
use ac_core::traits::MediaStore;
use ac_core::AppError;

use crate::error::ApiError;
use crate::upload::UploadedFile;

/// What a best-effort destroy batch did. `attempted` counts every
/// descriptor handed in (the number reported to callers); `failed` is for
/// the log only.
pub struct CleanupOutcome {
    pub attempted: usize,
    pub failed: usize,
}

/// Destroys a batch of images as an unordered concurrent group. One
/// failure never cancels the siblings. Descriptors without a `public_id`
/// (legacy rows) are counted but skipped.
pub async fn destroy_images(store: &dyn MediaStore, images: &[CoverImage]) -> CleanupOutcome {
    let tasks = images
        .iter()
        .filter(|image| !image.public_id.is_empty())
        .map(|image| async move {
            match store.destroy(&image.public_id).await {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("failed to remove image {}: {err:#}", image.public_id);
                    false
                }
            }
        });

    let failed = join_all(tasks).await.into_iter().filter(|ok| !ok).count();
    if failed > 0 {
        log::warn!("{failed} of {} image removal(s) failed", images.len());
    }
    CleanupOutcome {
        attempted: images.len(),
        failed,
    }
}

/// Uploads files in request order. If one upload fails, the ones that
/// already landed are torn down again before the error propagates.
pub async fn store_all(
    store: &dyn MediaStore,
    files: Vec<UploadedFile>,
) -> Result<Vec<CoverImage>, ApiError> {
    let mut stored = Vec::with_capacity(files.len());
    for file in files {
        match store.store(file.data, &file.filename).await {
            Ok(image) => stored.push(image),
            Err(err) => {
                log::error!("image upload failed for {}: {err:#}", file.filename);
                destroy_images(store, &stored).await;
                return Err(AppError::Internal("image upload failed".to_string()).into());
            }
        }
    }
    Ok(stored)
}
