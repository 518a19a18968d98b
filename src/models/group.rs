//! Study group model
//!
//! A group carries its membership list and its whole chat ledger; messages are
//! embedded and never addressed on their own.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::utils::errors::{CampusError, Result};
use crate::utils::helpers::{non_empty, require_field};

pub type GroupId = Uuid;

/// Designation whose groups skip the approval queue
pub const TEACHER_DESIGNATION: &str = "Teacher";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupStatus {
    Pending,
    Approved,
}

impl GroupStatus {
    /// Initial status for a group requested by someone with `designation`
    pub fn for_designation(designation: &str) -> Self {
        if designation == TEACHER_DESIGNATION {
            GroupStatus::Approved
        } else {
            GroupStatus::Pending
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Pending => "Pending",
            GroupStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupStatus {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Pending" => Ok(GroupStatus::Pending),
            "Approved" => Ok(GroupStatus::Approved),
            other => Err(CampusError::Validation(format!("Unknown group status: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub subject: String,
    pub created_by_email: String,
    pub created_by_designation: String,
    pub school: String,
    pub status: GroupStatus,
    pub members: Vec<String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn is_member(&self, email: &str) -> bool {
        self.members.iter().any(|m| m == email)
    }

    pub fn is_created_by(&self, email: &str) -> bool {
        self.created_by_email == email
    }
}

/// One chat entry. Persisted flat, the way it travels over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateGroupRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub created_by_email: Option<String>,
    pub created_by_designation: Option<String>,
    pub school: Option<String>,
}

/// Validated group creation input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub name: String,
    pub subject: String,
    pub created_by_email: String,
    pub created_by_designation: String,
    pub school: String,
    pub status: GroupStatus,
}

impl CreateGroupRequest {
    pub fn validate(self) -> Result<NewGroup> {
        let name = require_field(self.name, "name")?;
        let subject = require_field(self.subject, "subject")?;
        let created_by_email = require_field(self.created_by_email, "createdByEmail")?;
        let created_by_designation = self.created_by_designation.unwrap_or_default();
        let status = GroupStatus::for_designation(&created_by_designation);

        Ok(NewGroup {
            name,
            subject,
            created_by_email,
            created_by_designation,
            school: self.school.unwrap_or_default(),
            status,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppendMessageRequest {
    pub sender: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub file_url: Option<String>,
    pub file_name: Option<String>,
    pub file_type: Option<String>,
}

impl AppendMessageRequest {
    /// Build the ledger entry, stamped with `now`
    pub fn into_message(self, now: DateTime<Utc>) -> Result<Message> {
        let sender = require_field(self.sender, "sender")?;
        let content = non_empty(self.content);
        let image_url = non_empty(self.image_url);
        let file_url = non_empty(self.file_url);

        if content.is_none() && image_url.is_none() && file_url.is_none() {
            return Err(CampusError::Validation(
                "Missing content/image/file".to_string(),
            ));
        }

        // name and type only mean something next to a file
        let (file_name, file_type) = if file_url.is_some() {
            (non_empty(self.file_name), non_empty(self.file_type))
        } else {
            (None, None)
        };

        Ok(Message {
            sender,
            content,
            image_url,
            file_url,
            file_name,
            file_type,
            created_at: now,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipRequest {
    pub email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalAction {
    Approve,
    Reject,
}

impl FromStr for ApprovalAction {
    type Err = CampusError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "approve" => Ok(ApprovalAction::Approve),
            "reject" => Ok(ApprovalAction::Reject),
            other => Err(CampusError::Validation(format!(
                "Unknown action: {}. Expected approve or reject",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalRequest {
    pub action: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    Approved(Group),
    Rejected,
}

/// Query filter for group listings; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupFilter {
    pub status: Option<GroupStatus>,
    pub school: Option<String>,
    pub created_by_email: Option<String>,
}

impl GroupFilter {
    pub fn matches(&self, group: &Group) -> bool {
        self.status.map_or(true, |s| group.status == s)
            && self.school.as_deref().map_or(true, |s| group.school == s)
            && self
                .created_by_email
                .as_deref()
                .map_or(true, |e| group.created_by_email == e)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupListQuery {
    pub status: Option<String>,
    pub school: Option<String>,
    pub created_by_email: Option<String>,
}

impl TryFrom<GroupListQuery> for GroupFilter {
    type Error = CampusError;

    fn try_from(query: GroupListQuery) -> Result<Self> {
        let status = non_empty(query.status)
            .map(|s| s.parse::<GroupStatus>())
            .transpose()?;

        Ok(GroupFilter {
            status,
            school: non_empty(query.school),
            created_by_email: non_empty(query.created_by_email),
        })
    }
}

/// Who is looking at the group list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewer {
    pub email: Option<String>,
    pub designation: Option<String>,
    pub school: Option<String>,
}

impl Viewer {
    pub fn is_teacher(&self) -> bool {
        self.designation.as_deref() == Some(TEACHER_DESIGNATION)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteGroupQuery {
    pub requester: Option<String>,
}
