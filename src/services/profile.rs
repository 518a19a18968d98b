//! Profile service implementation
//!
//! Signup, login and profile edits for email/password accounts.

use std::sync::Arc;
use tracing::debug;
use crate::database::ProfileStore;
use crate::models::user::{
    ChangePasswordRequest, LoginRequest, NewProfile, Profile, ProfileChanges, PublicProfile,
    SignupRequest, UpdateProfileRequest,
};
use crate::utils::errors::{CampusError, Result};
use crate::utils::helpers::{is_valid_email, non_empty, require_field};
use crate::utils::logging::log_account_action;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Profile service for account management
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
    bcrypt_cost: u32,
}

impl ProfileService {
    /// Create a new ProfileService instance
    pub fn new(store: Arc<dyn ProfileStore>, bcrypt_cost: u32) -> Self {
        Self { store, bcrypt_cost }
    }

    /// Register a new account
    pub async fn signup(&self, request: SignupRequest) -> Result<PublicProfile> {
        let email = require_field(request.email, "email")?;
        let password = require_field(request.password, "password")?;
        let name = require_field(request.name, "name")?;
        let phone = require_field(request.phone, "phone")?;
        let designation = require_field(request.designation, "designation")?;
        let school = require_field(request.school, "school")?;

        if !is_valid_email(&email) {
            return Err(CampusError::Validation(format!("Invalid email: {}", email)));
        }

        debug!(email = %email, "Registering account");
        let password_hash = self.hash_password(password).await?;
        let profile = self
            .store
            .create(NewProfile {
                email,
                password_hash,
                name,
                phone,
                designation,
                school,
                photo_url: non_empty(request.photo_url),
            })
            .await?;

        log_account_action(&profile.email, "signup", true);
        Ok(profile.into())
    }

    /// Check credentials; unknown email and wrong password look the same
    pub async fn login(&self, request: LoginRequest) -> Result<PublicProfile> {
        let email = require_field(request.email, "email")?;
        let password = require_field(request.password, "password")?;

        let Some(profile) = self.store.find_by_email(&email).await? else {
            log_account_action(&email, "login", false);
            return Err(CampusError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        if !self.verify_password(password, profile.password_hash.clone()).await? {
            log_account_action(&email, "login", false);
            return Err(CampusError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        log_account_action(&email, "login", true);
        Ok(profile.into())
    }

    pub async fn get_profile(&self, email: Option<String>) -> Result<PublicProfile> {
        let email = require_field(email, "email")?;
        Ok(self.find_profile(&email).await?.into())
    }

    /// Apply a partial profile edit
    pub async fn update_profile(&self, request: UpdateProfileRequest) -> Result<PublicProfile> {
        let email = require_field(request.email, "email")?;
        let changes = ProfileChanges {
            name: request.name,
            phone: request.phone,
            designation: request.designation,
            school: request.school,
            photo_url: request.photo_url,
        };

        let profile = self
            .store
            .update(&email, changes)
            .await?
            .ok_or_else(|| profile_not_found(&email))?;

        log_account_action(&email, "update_profile", true);
        Ok(profile.into())
    }

    pub async fn change_password(&self, request: ChangePasswordRequest) -> Result<()> {
        let email = require_field(request.email, "email")?;
        let current = require_field(request.current_password, "currentPassword")?;
        let new_password = require_field(request.new_password, "newPassword")?;

        let profile = self.find_profile(&email).await?;
        if !self.verify_password(current, profile.password_hash).await? {
            log_account_action(&email, "change_password", false);
            return Err(CampusError::Unauthorized("Incorrect current password".to_string()));
        }

        let hash = self.hash_password(new_password).await?;
        if !self.store.set_password_hash(&email, &hash).await? {
            return Err(profile_not_found(&email));
        }

        log_account_action(&email, "change_password", true);
        Ok(())
    }

    async fn find_profile(&self, email: &str) -> Result<Profile> {
        self.store
            .find_by_email(email)
            .await?
            .ok_or_else(|| profile_not_found(email))
    }

    async fn hash_password(&self, password: String) -> Result<String> {
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| CampusError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(CampusError::from)
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| CampusError::Internal(format!("Password check task failed: {}", e)))?
            .map_err(CampusError::from)
    }
}

fn profile_not_found(email: &str) -> CampusError {
    CampusError::NotFound(format!("User not found: {}", email))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use assert_matches::assert_matches;

    fn service() -> ProfileService {
        ProfileService::new(Arc::new(MemoryStore::new()), 4)
    }

    fn signup(email: &str) -> SignupRequest {
        SignupRequest {
            email: Some(email.into()),
            password: Some("hunter22".into()),
            name: Some("Asha".into()),
            phone: Some("5550100".into()),
            designation: Some("Student".into()),
            school: Some("SOET".into()),
            photo_url: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let service = service();
        let profile = service.signup(signup("a@x.com")).await.unwrap();
        assert_eq!(profile.email, "a@x.com");

        assert_eq!(service.login(login("a@x.com", "hunter22")).await.unwrap(), profile);
        assert_matches!(service.login(login("a@x.com", "wrong")).await, Err(CampusError::Unauthorized(_)));
        assert_matches!(service.login(login("nobody@x.com", "hunter22")).await, Err(CampusError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_signup_validation_and_conflict() {
        let service = service();
        let mut missing = signup("a@x.com");
        missing.phone = None;
        assert_matches!(service.signup(missing).await, Err(CampusError::Validation(_)));
        assert_matches!(service.signup(signup("not-an-email")).await, Err(CampusError::Validation(_)));

        service.signup(signup("a@x.com")).await.unwrap();
        assert_matches!(service.signup(signup("a@x.com")).await, Err(CampusError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = service();
        service.signup(signup("a@x.com")).await.unwrap();

        let wrong = ChangePasswordRequest {
            email: Some("a@x.com".into()),
            current_password: Some("nope".into()),
            new_password: Some("newpass1".into()),
        };
        assert_matches!(service.change_password(wrong).await, Err(CampusError::Unauthorized(_)));

        let right = ChangePasswordRequest {
            email: Some("a@x.com".into()),
            current_password: Some("hunter22".into()),
            new_password: Some("newpass1".into()),
        };
        service.change_password(right).await.unwrap();
        assert!(service.login(login("a@x.com", "newpass1")).await.is_ok());
        assert_matches!(service.login(login("a@x.com", "hunter22")).await, Err(CampusError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_update_profile_is_partial() {
        let service = service();
        service.signup(signup("a@x.com")).await.unwrap();

        let updated = service
            .update_profile(UpdateProfileRequest {
                email: Some("a@x.com".into()),
                school: Some("SOM".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.school, "SOM");
        assert_eq!(updated.name, "Asha");

        let unknown = service
            .update_profile(UpdateProfileRequest {
                email: Some("b@x.com".into()),
                ..Default::default()
            })
            .await;
        assert_matches!(unknown, Err(CampusError::NotFound(_)));
    }
}
