//! Client library
//!
//! A typed REST client for the API and the polling synchronizer that keeps an
//! open chat view current.

pub mod api;
pub mod sync;

pub use api::{ApiClient, OutgoingAttachments};
pub use sync::{ChatSynchronizer, GroupSource, SyncState};
