//! # Multipart extraction
//!
//! Streams a multipart form into memory: text fields into a map, file
//! fields validated against a static [`UploadPolicy`] before a single byte
//! is handed to the media store. A policy violation aborts the whole
//! request with a 400 and nothing stored.

use std::collections::HashMap;
use std::path::Path;

use actix_multipart::Multipart;
use futures_util::StreamExt;

use ac_core::AppError;

use crate::error::ApiError;

/// Static per-request upload limits.
pub struct UploadPolicy {
    pub max_file_bytes: usize,
    pub max_files: usize,
    pub allowed_extensions: &'static [&'static str],
}

/// Cover uploads: up to ten web images of at most 5 MiB each.
pub const COVER_POLICY: UploadPolicy = UploadPolicy {
    max_file_bytes: 5 * 1024 * 1024,
    max_files: 10,
    allowed_extensions: &["jpg", "jpeg", "png", "webp"],
};

/// Single-image resources (partner brands).
pub const SINGLE_IMAGE_POLICY: UploadPolicy = UploadPolicy {
    max_file_bytes: 5 * 1024 * 1024,
    max_files: 1,
    allowed_extensions: &["jpg", "jpeg", "png", "webp"],
};

pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

pub struct FormData {
    pub fields: HashMap<String, String>,
    pub files: Vec<UploadedFile>,
}

impl FormData {
    /// Trimmed text field; empty and missing are both `None`.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

fn extension_of(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase()
}

pub async fn read_form(mut payload: Multipart, policy: &UploadPolicy) -> Result<FormData, ApiError> {
    let mut fields = HashMap::new();
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(item) = payload.next().await {
        let mut field = item
            .map_err(|err| AppError::Validation(format!("malformed multipart payload: {err}")))?;

        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(str::to_string))
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(str::to_string));

        match filename {
            Some(filename) => {
                if files.len() >= policy.max_files {
                    return Err(AppError::Validation(format!(
                        "at most {} image(s) per request",
                        policy.max_files
                    ))
                    .into());
                }
                let ext = extension_of(&filename);
                if !policy.allowed_extensions.contains(&ext.as_str()) {
                    return Err(AppError::Validation(format!(
                        "unsupported image format: {filename}"
                    ))
                    .into());
                }

                let mut data = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|err| {
                        AppError::Validation(format!("malformed multipart payload: {err}"))
                    })?;
                    if data.len() + chunk.len() > policy.max_file_bytes {
                        return Err(AppError::Validation(format!(
                            "image {filename} exceeds the 5 MiB limit"
                        ))
                        .into());
                    }
                    data.extend_from_slice(&chunk);
                }
                files.push(UploadedFile { filename, data });
            }
            None => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk.map_err(|err| {
                        AppError::Validation(format!("malformed multipart payload: {err}"))
                    })?;
                    bytes.extend_from_slice(&chunk);
                }
                let value = String::from_utf8(bytes)
                    .map_err(|_| AppError::Validation(format!("field {name} is not valid UTF-8")))?;
                fields.insert(name, value);
            }
        }
    }

    Ok(FormData { fields, files })
}
