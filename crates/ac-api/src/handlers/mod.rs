//! One module per resource group. Each exposes a `configure_routes` the
//! binary mounts under the resource's base path.

pub mod admins;
pub mod news;
pub mod painting;
pub mod partners;
pub mod shop;
