//! Error handling for CampusConnect
//!
//! This module defines the main error type used throughout the application,
//! its mapping onto HTTP responses, and the crate-wide `Result` alias.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for CampusConnect
#[derive(Error, Debug)]
pub enum CampusError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Remote API error ({status}): {message}")]
    Remote { status: u16, message: String },

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for CampusConnect operations
pub type Result<T> = std::result::Result<T, CampusError>;

impl CampusError {
    /// Group lookups that miss share one message shape
    pub fn group_not_found(id: impl std::fmt::Display) -> Self {
        CampusError::NotFound(format!("group {} not found", id))
    }

    /// Machine-readable kind used in error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            CampusError::NotFound(_) => "NotFound",
            CampusError::Forbidden(_) => "Forbidden",
            CampusError::Validation(_) => "ValidationError",
            CampusError::Conflict(_) => "Conflict",
            CampusError::Unauthorized(_) => "Unauthorized",
            CampusError::Upstream(_) | CampusError::Http(_) => "UpstreamFailure",
            CampusError::RateLimitExceeded => "RateLimited",
            CampusError::Remote { .. } => "RemoteError",
            CampusError::Database(_) | CampusError::Migration(_) => "DatabaseError",
            _ => "InternalError",
        }
    }

    /// HTTP status this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            CampusError::NotFound(_) => StatusCode::NOT_FOUND,
            CampusError::Forbidden(_) => StatusCode::FORBIDDEN,
            CampusError::Validation(_) => StatusCode::BAD_REQUEST,
            CampusError::Conflict(_) => StatusCode::CONFLICT,
            CampusError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            CampusError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            CampusError::Remote { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CampusError::Database(_) => ErrorSeverity::Critical,
            CampusError::Migration(_) => ErrorSeverity::Critical,
            CampusError::Config(_) => ErrorSeverity::Critical,
            CampusError::Forbidden(_) => ErrorSeverity::Warning,
            CampusError::Unauthorized(_) => ErrorSeverity::Warning,
            CampusError::RateLimitExceeded => ErrorSeverity::Warning,
            CampusError::Validation(_) | CampusError::NotFound(_) | CampusError::Conflict(_) => {
                ErrorSeverity::Info
            }
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Wire shape of every non-2xx response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for CampusError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 5xx bodies stay generic, the detail only goes to the log
        let message = if status.is_server_error() {
            tracing::error!(error = %self, severity = %self.severity(), "Request failed");
            match &self {
                CampusError::Upstream(_) | CampusError::Http(_) => "Upstream service failed".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            tracing::warn!(error = %self, status = status.as_u16(), "Request rejected");
            match &self {
                CampusError::NotFound(msg)
                | CampusError::Forbidden(msg)
                | CampusError::Validation(msg)
                | CampusError::Conflict(msg)
                | CampusError::Unauthorized(msg) => msg.clone(),
                CampusError::Remote { message, .. } => message.clone(),
                other => other.to_string(),
            }
        };

        let body = Json(ErrorResponse {
            error: self.kind().to_string(),
            message,
        });

        (status, body).into_response()
    }
}
