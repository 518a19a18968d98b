//! Account profile model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Profile {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub designation: String,
    pub school: String,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What the API returns for an account; never the hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub email: String,
    pub name: String,
    pub phone: String,
    pub designation: String,
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl From<Profile> for PublicProfile {
    fn from(profile: Profile) -> Self {
        Self {
            email: profile.email,
            name: profile.name,
            phone: profile.phone,
            designation: profile.designation,
            school: profile.school,
            photo_url: profile.photo_url,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub school: Option<String>,
    pub photo_url: Option<String>,
}

/// Validated profile creation input, password already hashed
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub designation: String,
    pub school: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileQuery {
    pub email: Option<String>,
}

/// Partial profile edit; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub school: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChangePasswordRequest {
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub designation: Option<String>,
    pub school: Option<String>,
    pub photo_url: Option<String>,
}

impl ProfileChanges {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(name) = self.name {
            profile.name = name;
        }
        if let Some(phone) = self.phone {
            profile.phone = phone;
        }
        if let Some(designation) = self.designation {
            profile.designation = designation;
        }
        if let Some(school) = self.school {
            profile.school = school;
        }
        if let Some(photo_url) = self.photo_url {
            profile.photo_url = Some(photo_url);
        }
    }
}
