//! Cross-origin policy for the public site's browser frontend.

use actix_cors::Cors;

/// Restricts browser callers to the one configured origin, with
/// credentials, for the four verbs the API uses.
pub fn cors_policy(allowed_origin: &str) -> Cors {
    Cors::default()
        .allowed_origin(allowed_origin)
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
