//! CampusConnect backend
//!
//! REST API for a campus community: study groups with an approval workflow,
//! membership and an embedded chat ledger, account profiles, and media upload
//! to a hosted media service. The `client` module holds a typed REST client and
//! the polling synchronizer used by an open chat view.

#![allow(non_snake_case)]

pub mod client;
pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::build_router;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
