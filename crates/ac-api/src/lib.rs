//! # ac-api
//!
//! The web routing and orchestration layer: one handler module per
//! resource, a shared multipart extractor, and the best-effort image
//! cleanup used by every mutating route.

pub mod cleanup;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod upload;

use std::sync::Arc;

use ac_core::traits::{CmsRepo, CredentialHasher, MediaStore};

/// State shared across all workers.
pub struct AppState {
    pub repo: Arc<dyn CmsRepo>,
    pub media: Arc<dyn MediaStore>,
    pub hasher: Arc<dyn CredentialHasher>,
    /// Author recorded when a create request does not name one.
    pub default_author_id: i64,
}
