//! # AppError
//!
//! Centralized error taxonomy for the Atelier CMS backend. Handlers convert
//! every variant into an HTTP response; nothing crosses a resource boundary.

use thiserror::Error;

/// The primary error type for all handler-visible failures.
#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or invalid input; no side effect has happened.
    #[error("{0}")]
    Validation(String),

    /// The identifier has no matching row.
    #[error("{0} not found")]
    NotFound(String),

    /// Credential verification failed.
    #[error("{0}")]
    Unauthorized(String),

    /// The resource already exists (duplicate administrator name/email).
    #[error("{0}")]
    Conflict(String),

    /// Infrastructure failure (database statement, media store call).
    /// The triggering context is logged server-side, not surfaced.
    #[error("{0}")]
    Internal(String),
}

/// A specialized Result type for Atelier CMS logic.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        log::error!("internal error: {err:#}");
        AppError::Internal("internal server error".to_string())
    }
}
