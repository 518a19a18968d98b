//! Database repositories module
//!
//! Postgres implementations of the storage traits

pub mod user;
pub mod group;

// Re-export repositories
pub use user::UserRepository;
pub use group::GroupRepository;
