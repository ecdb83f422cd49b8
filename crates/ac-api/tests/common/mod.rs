//! Shared fixtures: an in-memory repository, a recording media store, and a
//! multipart body builder.

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::web;
use async_trait::async_trait;

use ac_api::handlers::{admins, news, painting, partners, shop};
use ac_api::AppState;
use ac_auth_simple::ArgonCredentialHasher;
use ac_core::models::CoverImage;
use ac_core::traits::MediaStore;
use ac_db_sqlite::SqliteCmsRepo;

/// Media-store double that hands out deterministic descriptors and records
/// every store/destroy call.
#[derive(Default)]
pub struct RecordingMediaStore {
    counter: AtomicUsize,
    pub stored: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaStore for RecordingMediaStore {
    async fn store(&self, _data: Vec<u8>, original_name: &str) -> anyhow::Result<CoverImage> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        let public_id = format!("assets/{n}-{original_name}");
        self.stored.lock().unwrap().push(public_id.clone());
        Ok(CoverImage {
            url: format!("https://img.test/{public_id}"),
            public_id,
        })
    }

    async fn destroy(&self, public_id: &str) -> anyhow::Result<()> {
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

pub struct TestCtx {
    pub repo: Arc<SqliteCmsRepo>,
    pub media: Arc<RecordingMediaStore>,
}

impl TestCtx {
    pub async fn new() -> Self {
        Self {
            repo: Arc::new(SqliteCmsRepo::in_memory().await.expect("in-memory repo")),
            media: Arc::new(RecordingMediaStore::default()),
        }
    }

    pub fn state(&self) -> web::Data<AppState> {
        web::Data::new(AppState {
            repo: self.repo.clone(),
            media: self.media.clone(),
            hasher: Arc::new(ArgonCredentialHasher),
            default_author_id: 1,
        })
    }

    pub fn stored(&self) -> Vec<String> {
        self.media.stored.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.media.destroyed.lock().unwrap().clone()
    }
}

/// Mounts every resource group exactly as the binary does.
pub fn mount_all(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/news").configure(news::configure_routes))
        .service(web::scope("/painting-news").configure(painting::configure_routes))
        .service(web::scope("/shop").configure(shop::configure_routes))
        .service(web::scope("/partners").configure(partners::configure_routes))
        .service(web::scope("/admin").configure(admins::configure_routes));
}

pub const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for (name, filename, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
