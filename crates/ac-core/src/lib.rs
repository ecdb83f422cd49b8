//! # ac-core
//!
//! The central domain models and interface definitions for the Atelier CMS
//! backend. The API crate and the plugin crates only ever talk to each other
//! through the types defined here.

pub mod cover;
pub mod error;
pub mod models;
pub mod traits;

// Re-exporting for easier access in other crates
pub use cover::*;
pub use error::*;
pub use models::*;
pub use traits::*;
