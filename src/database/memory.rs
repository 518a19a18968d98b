//! In-memory storage backend
//!
//! Used for local development and the test suite. Each operation runs under a
//! single write lock, which gives the same per-record atomicity the Postgres
//! repositories get from single-statement updates.

use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use crate::database::store::{GroupStore, ProfileStore};
use crate::models::{Group, GroupFilter, GroupId, GroupStatus, Message, NewGroup, NewProfile, Profile, ProfileChanges};
use crate::utils::errors::{CampusError, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    // insertion order; listings walk it backwards for newest first
    groups: Arc<RwLock<Vec<Group>>>,
    profiles: Arc<RwLock<HashMap<String, Profile>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify<F>(&self, id: GroupId, f: F) -> Result<Option<Group>>
    where
        F: FnOnce(&mut Group) + Send,
    {
        let mut groups = self.groups.write().await;
        Ok(groups.iter_mut().find(|g| g.id == id).map(|group| {
            f(group);
            group.updated_at = Utc::now();
            group.clone()
        }))
    }
}

#[async_trait]
impl GroupStore for MemoryStore {
    async fn create(&self, group: NewGroup) -> Result<Group> {
        let now = Utc::now();
        let created = Group {
            id: Uuid::new_v4(),
            members: vec![group.created_by_email.clone()],
            name: group.name,
            subject: group.subject,
            created_by_email: group.created_by_email,
            created_by_designation: group.created_by_designation,
            school: group.school,
            status: group.status,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.groups.write().await.push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>> {
        let groups = self.groups.read().await;
        Ok(groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let groups = self.groups.read().await;
        Ok(groups
            .iter()
            .rev()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: GroupId, status: GroupStatus) -> Result<Option<Group>> {
        self.modify(id, |group| group.status = status).await
    }

    async fn delete(&self, id: GroupId) -> Result<bool> {
        let mut groups = self.groups.write().await;
        let before = groups.len();
        groups.retain(|g| g.id != id);
        Ok(groups.len() < before)
    }

    async fn add_member(&self, id: GroupId, email: &str) -> Result<Option<Group>> {
        self.modify(id, |group| {
            if !group.is_member(email) {
                group.members.push(email.to_string());
            }
        })
        .await
    }

    async fn remove_member(&self, id: GroupId, email: &str) -> Result<Option<Group>> {
        self.modify(id, |group| group.members.retain(|m| m != email)).await
    }

    async fn push_message(&self, id: GroupId, message: &Message) -> Result<Option<Group>> {
        let message = message.clone();
        self.modify(id, move |group| group.messages.push(message)).await
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn create(&self, profile: NewProfile) -> Result<Profile> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.email) {
            return Err(CampusError::Conflict(format!("Account already exists: {}", profile.email)));
        }

        let now = Utc::now();
        let created = Profile {
            email: profile.email,
            password_hash: profile.password_hash,
            name: profile.name,
            phone: profile.phone,
            designation: profile.designation,
            school: profile.school,
            photo_url: profile.photo_url,
            created_at: now,
            updated_at: now,
        };
        profiles.insert(created.email.clone(), created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Profile>> {
        Ok(self.profiles.read().await.get(email).cloned())
    }

    async fn update(&self, email: &str, changes: ProfileChanges) -> Result<Option<Profile>> {
        let mut profiles = self.profiles.write().await;
        Ok(profiles.get_mut(email).map(|profile| {
            changes.apply(profile);
            profile.updated_at = Utc::now();
            profile.clone()
        }))
    }

    async fn set_password_hash(&self, email: &str, password_hash: &str) -> Result<bool> {
        let mut profiles = self.profiles.write().await;
        match profiles.get_mut(email) {
            Some(profile) => {
                profile.password_hash = password_hash.to_string();
                profile.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
