//! Services module
//!
//! This module contains business logic services

pub mod groups;
pub mod media;
pub mod profile;

// Re-export commonly used services
pub use groups::GroupService;
pub use media::{CloudinaryUploader, MediaUploader, sign_params};
pub use profile::ProfileService;

use std::sync::Arc;
use crate::config::settings::Settings;
use crate::database::{health_check, DatabaseService};
use crate::utils::errors::Result;

/// Service factory holding every service a request handler can reach.
///
/// Built once at startup and handed to the router as state.
#[derive(Clone)]
pub struct ServiceFactory {
    pub group_service: GroupService,
    pub profile_service: ProfileService,
    pub media_service: Arc<dyn MediaUploader>,
    pub database: DatabaseService,
    pub settings: Arc<Settings>,
}

impl ServiceFactory {
    /// Create a new ServiceFactory on top of an initialized database service
    pub fn new(settings: Settings, database: DatabaseService) -> Result<Self> {
        let media_service = Arc::new(CloudinaryUploader::new(settings.media.clone())?);
        Ok(Self::with_uploader(settings, database, media_service))
    }

    /// Same as `new`, with the media uploader supplied by the caller
    pub fn with_uploader(settings: Settings, database: DatabaseService, media_service: Arc<dyn MediaUploader>) -> Self {
        let group_service = GroupService::new(database.groups.clone());
        let profile_service = ProfileService::new(database.profiles.clone(), settings.auth.bcrypt_cost);

        Self {
            group_service,
            profile_service,
            media_service,
            database,
            settings: Arc::new(settings),
        }
    }

    /// Health check for all services
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let database_healthy = match self.database.pool() {
            Some(pool) => health_check(pool).await.is_ok(),
            None => true,
        };
        let media = &self.settings.media;
        let media_configured = !media.cloud_name.is_empty()
            && (media.upload_preset.is_some() || (media.api_key.is_some() && media.api_secret.is_some()));

        ServiceHealthStatus {
            database_healthy,
            media_configured,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    pub media_configured: bool,
}

impl ServiceHealthStatus {
    /// Uploads can be misconfigured without taking the API down
    pub fn is_healthy(&self) -> bool {
        self.database_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if !self.media_configured {
            issues.push("Media service not configured".to_string());
        }

        issues
    }
}
