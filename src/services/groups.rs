//! Group service implementation
//!
//! This service covers the approval workflow, membership management and the
//! per-group message ledger.

use std::sync::Arc;
use chrono::Utc;
use tracing::{debug, info};
use crate::database::GroupStore;
use crate::models::group::{
    AppendMessageRequest, ApprovalAction, ApprovalOutcome, CreateGroupRequest, Group, GroupFilter,
    GroupId, GroupStatus, Viewer,
};
use crate::utils::errors::{CampusError, Result};
use crate::utils::helpers::{non_empty, require_field, truncate_text};
use crate::utils::logging::log_group_event;

/// Group service for the approval workflow, membership and chat ledger
#[derive(Clone)]
pub struct GroupService {
    store: Arc<dyn GroupStore>,
}

impl GroupService {
    /// Create a new GroupService instance
    pub fn new(store: Arc<dyn GroupStore>) -> Self {
        Self { store }
    }

    /// Create a group; teachers get an approved group, everyone else a pending request
    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<Group> {
        let new_group = request.validate()?;
        debug!(created_by = %new_group.created_by_email, status = %new_group.status, "Creating group");

        let group = self.store.create(new_group).await?;
        log_group_event(
            &group.id.to_string(),
            "created",
            Some(&group.created_by_email),
            Some(group.status.as_str()),
        );

        Ok(group)
    }

    pub async fn get_group(&self, id: GroupId) -> Result<Group> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| CampusError::group_not_found(id))
    }

    /// Groups matching the filter, newest first
    pub async fn list_groups(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        self.store.list(filter).await
    }

    /// Everything `viewer` is allowed to see in the group list.
    ///
    /// Pending groups come first: a teacher sees the pending requests of their
    /// school, anyone else (a teacher without a school included) only their
    /// own. Approved groups of the viewer's school follow, or of every school
    /// when the viewer gives none.
    pub async fn visible_groups(&self, viewer: &Viewer) -> Result<Vec<Group>> {
        let school = non_empty(viewer.school.clone());

        let pending = if viewer.is_teacher() && school.is_some() {
            let filter = GroupFilter {
                status: Some(GroupStatus::Pending),
                school: school.clone(),
                created_by_email: None,
            };
            self.store.list(&filter).await?
        } else if let Some(email) = non_empty(viewer.email.clone()) {
            let filter = GroupFilter {
                status: Some(GroupStatus::Pending),
                school: None,
                created_by_email: Some(email),
            };
            self.store.list(&filter).await?
        } else {
            Vec::new()
        };

        let approved = self
            .store
            .list(&GroupFilter {
                status: Some(GroupStatus::Approved),
                school,
                created_by_email: None,
            })
            .await?;

        Ok(pending.into_iter().chain(approved).collect())
    }

    /// Approve a group in place, or reject it by deleting it
    pub async fn approve_or_reject(&self, id: GroupId, action: ApprovalAction) -> Result<ApprovalOutcome> {
        match action {
            ApprovalAction::Approve => {
                let group = self
                    .store
                    .set_status(id, GroupStatus::Approved)
                    .await?
                    .ok_or_else(|| CampusError::group_not_found(id))?;
                log_group_event(&id.to_string(), "approved", None, None);
                Ok(ApprovalOutcome::Approved(group))
            }
            ApprovalAction::Reject => {
                if !self.store.delete(id).await? {
                    return Err(CampusError::group_not_found(id));
                }
                log_group_event(&id.to_string(), "rejected", None, None);
                Ok(ApprovalOutcome::Rejected)
            }
        }
    }

    /// Add `email` to the members; joining twice changes nothing
    pub async fn join(&self, id: GroupId, email: Option<String>) -> Result<Group> {
        let email = require_field(email, "email")?;
        let group = self
            .store
            .add_member(id, &email)
            .await?
            .ok_or_else(|| CampusError::group_not_found(id))?;

        log_group_event(&id.to_string(), "joined", Some(&email), None);
        Ok(group)
    }

    /// Remove `email` from the members; leaving as a non-member changes nothing
    pub async fn leave(&self, id: GroupId, email: Option<String>) -> Result<Group> {
        let email = require_field(email, "email")?;
        let group = self
            .store
            .remove_member(id, &email)
            .await?
            .ok_or_else(|| CampusError::group_not_found(id))?;

        log_group_event(&id.to_string(), "left", Some(&email), None);
        Ok(group)
    }

    /// Append a message and return the group with its full history
    pub async fn append_message(&self, id: GroupId, request: AppendMessageRequest) -> Result<Group> {
        let message = request.into_message(Utc::now())?;
        let sender = message.sender.clone();
        let preview = message.content.as_deref().map(|c| truncate_text(c, 40));

        let group = self
            .store
            .push_message(id, &message)
            .await?
            .ok_or_else(|| CampusError::group_not_found(id))?;

        debug!(
            group_id = %id,
            sender = %sender,
            preview = ?preview,
            messages = group.messages.len(),
            "Message appended"
        );
        Ok(group)
    }

    /// Delete a group on behalf of its creator
    pub async fn delete_group(&self, id: GroupId, requester: Option<&str>) -> Result<()> {
        let group = self.get_group(id).await?;

        match requester {
            Some(requester) if group.is_created_by(requester) => {}
            _ => {
                return Err(CampusError::Forbidden(
                    "Only the group creator can delete this group".to_string(),
                ))
            }
        }

        if !self.store.delete(id).await? {
            return Err(CampusError::group_not_found(id));
        }

        info!(group_id = %id, requester = ?requester, "Group deleted");
        Ok(())
    }
}
