//! Storage traits the services depend on
//!
//! Every mutating method is a single atomic operation on one record, so
//! concurrent joins or appends against the same group never lose updates.
//! Methods addressing a group by id return `Ok(None)` when it does not exist.

use async_trait::async_trait;
use crate::models::{Group, GroupFilter, GroupId, GroupStatus, Message, NewGroup, NewProfile, Profile, ProfileChanges};
use crate::utils::errors::Result;

#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Persist a new group with the creator as sole member and an empty ledger
    async fn create(&self, group: NewGroup) -> Result<Group>;

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>>;

    /// Groups matching `filter`, newest first
    async fn list(&self, filter: &GroupFilter) -> Result<Vec<Group>>;

    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<Group>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: GroupId) -> Result<bool>;

    /// Add-to-set: a no-op when `email` is already a member
    async fn add_member(&self, id: GroupId, email: &str) -> Result<Option<Group>>;

    /// Remove-from-set: a no-op when `email` is not a member
    async fn remove_member(&self, id: GroupId, email: &str) -> Result<Option<Group>>;

    /// Append to the end of the ledger
    async fn push_message(&self, id: GroupId, message: &Message) -> Result<Option<Group>>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fails with `CampusError::Conflict` if the email is taken
    async fn create(&self, profile: NewProfile) -> Result<Profile>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>>;

    async fn update(&self, email: &str, changes: ProfileChanges) -> Result<Option<Profile>>;

    /// Returns whether the account existed
    async fn set_password_hash(&self, email: &str, password_hash: &str) -> Result<bool>;
}
