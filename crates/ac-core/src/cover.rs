//! # Cover codec
//!
//! The cover column changed shape over the site's lifetime: a bare filename,
//! a comma-separated filename list, a single `{url, public_id}` object, and
//! finally a JSON array of such objects. Every read path goes through
//! [`decode_cover`], which accepts all of them; every write path goes
//! through [`encode_cover`]/[`encode_image`], which emit only the current
//! canonical shape.

use serde_json::Value;

use crate::models::CoverImage;

/// Decodes a stored cover column into an ordered image sequence.
///
/// Attempts a structured JSON parse first (array or single object), then
/// falls back to treating the raw value as a comma-separated legacy filename
/// list. Returns an empty sequence rather than erroring on anything else.
pub fn decode_cover(raw: &str) -> Vec<CoverImage> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Array(items)) => items.into_iter().filter_map(value_to_image).collect(),
        Ok(value @ Value::Object(_)) => value_to_image(value).map(|img| vec![img]).unwrap_or_default(),
        // A JSON string is still the legacy encoding, just quoted.
        Ok(Value::String(inner)) => split_legacy(&inner),
        _ => split_legacy(trimmed),
    }
}

/// Encodes an image sequence into the canonical array-of-objects shape.
pub fn encode_cover(images: &[CoverImage]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

/// Encodes a single image (partner brands store exactly one).
pub fn encode_image(image: &CoverImage) -> String {
    serde_json::to_string(image).unwrap_or_else(|_| "{}".to_string())
}

fn value_to_image(value: Value) -> Option<CoverImage> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        // Tolerate arrays that mix in plain filename strings.
        Value::String(name) if !name.trim().is_empty() => Some(CoverImage {
            url: String::new(),
            public_id: name.trim().to_string(),
        }),
        _ => None,
    }
}

/// Legacy fallback: each comma-separated filename becomes a minimal record
/// with only its `public_id` set.
fn split_legacy(raw: &str) -> Vec<CoverImage> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| CoverImage {
            url: String::new(),
            public_id: part.to_string(),
        })
        .collect()
}
