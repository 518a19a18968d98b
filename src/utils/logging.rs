//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the CampusConnect application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};
use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer on drop and must live as long
/// as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.level));

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = match &config.directory {
        Some(directory) => {
            let file_appender = tracing_appender::rolling::daily(directory, "campusconnect.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log group workflow and membership events
pub fn log_group_event(group_id: &str, event: &str, actor: Option<&str>, details: Option<&str>) {
    info!(
        group_id = group_id,
        event = event,
        actor = actor,
        details = details,
        "Group event occurred"
    );
}

/// Log account actions
pub fn log_account_action(email: &str, action: &str, success: bool) {
    if success {
        info!(email = email, action = action, "Account action performed");
    } else {
        warn!(email = email, action = action, "Account action rejected");
    }
}

/// Log media upload results
pub fn log_upload(file_name: &str, size_bytes: usize, url: Option<&str>) {
    match url {
        Some(url) => info!(file_name = file_name, size_bytes = size_bytes, url = url, "Media uploaded"),
        None => warn!(file_name = file_name, size_bytes = size_bytes, "Media upload failed"),
    }
}

/// Log API errors with context
pub fn log_api_error(api: &str, error: &str, context: Option<&str>) {
    error!(
        api = api,
        error = error,
        context = context,
        "API error occurred"
    );
}

/// Log handled HTTP requests
pub fn log_request(method: &str, path: &str, status: u16, duration_ms: u64) {
    if status >= 500 {
        error!(method = method, path = path, status = status, duration_ms = duration_ms, "Request completed");
    } else if status >= 400 {
        warn!(method = method, path = path, status = status, duration_ms = duration_ms, "Request completed");
    } else {
        debug!(method = method, path = path, status = status, duration_ms = duration_ms, "Request completed");
    }
}
