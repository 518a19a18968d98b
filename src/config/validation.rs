//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{CampusError, Result};
use super::settings::StorageBackend;
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_media_config(&settings.media)?;
    validate_auth_config(&settings.auth)?;
    validate_sync_config(&settings.sync)?;
    validate_logging_config(&settings.logging)?;

    Ok(())
}

/// Validate server configuration
fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CampusError::Config("Server host is required".to_string()));
    }

    if config.max_body_bytes == 0 {
        return Err(CampusError::Config(
            "Max body size must be greater than 0".to_string()
        ));
    }

    if config.rate_limit_per_minute == Some(0) {
        return Err(CampusError::Config(
            "Rate limit must be greater than 0 when set".to_string()
        ));
    }

    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.backend == StorageBackend::Memory {
        return Ok(());
    }

    if config.url.is_empty() {
        return Err(CampusError::Config(
            "Database URL is required".to_string()
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate media service configuration
///
/// Missing credentials are not fatal here: uploads fail per request instead.
fn validate_media_config(config: &super::MediaConfig) -> Result<()> {
    if config.api_base_url.is_empty() {
        return Err(CampusError::Config(
            "Media API base URL is required".to_string()
        ));
    }

    url::Url::parse(&config.api_base_url)
        .map_err(|e| CampusError::Config(format!("Invalid media API base URL: {}", e)))?;

    if config.timeout_seconds == 0 {
        return Err(CampusError::Config(
            "Media timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate account credential configuration
fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    // bcrypt accepts costs in 4..=31
    if !(4..=31).contains(&config.bcrypt_cost) {
        return Err(CampusError::Config(
            format!("Invalid bcrypt cost: {}. Expected 4..=31", config.bcrypt_cost)
        ));
    }

    Ok(())
}

/// Validate chat synchronization configuration
fn validate_sync_config(config: &super::SyncConfig) -> Result<()> {
    if config.poll_interval_ms == 0 {
        return Err(CampusError::Config(
            "Poll interval must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(CampusError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}
