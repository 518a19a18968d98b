//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod group;
pub mod media;

// Re-export commonly used models
pub use user::{Profile, PublicProfile, NewProfile, ProfileChanges, SignupRequest, LoginRequest, ProfileQuery, UpdateProfileRequest, ChangePasswordRequest};
pub use group::{Group, GroupId, GroupStatus, Message, NewGroup, CreateGroupRequest, AppendMessageRequest, MembershipRequest, ApprovalAction, ApprovalRequest, ApprovalOutcome, GroupFilter, GroupListQuery, Viewer, DeleteGroupQuery, TEACHER_DESIGNATION};
pub use media::{UploadedMedia, MediaPayload};
