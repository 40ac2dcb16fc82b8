//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the TravelBuddy application.

use tracing::{info, warn, error, debug};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use crate::config::LoggingConfig;
use crate::utils::errors::{Result, TravelBuddyError};

/// Initialize logging based on configuration
///
/// The returned guard flushes the file writer when dropped, so keep it alive
/// for as long as the process runs.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "travelbuddy.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(non_blocking))
        .try_init()
        .map_err(|e| TravelBuddyError::Config(format!("Failed to install subscriber: {}", e)))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a session operation with structured data
pub fn log_session_action(session_id: &str, action: &str, details: Option<&str>) {
    info!(
        session_id = session_id,
        action = action,
        details = details,
        "Session action performed"
    );
}

/// Log the outcome of a flight search
pub fn log_search_result(session_id: &str, mode: &str, results: usize) {
    if results == 0 {
        warn!(session_id = session_id, mode = mode, "Search returned no flights");
    } else {
        info!(session_id = session_id, mode = mode, results = results, "Search results stored");
    }
}

/// Log a confirmed booking
pub fn log_booking(session_id: &str, user_id: i64, booking_id: i64, trip_type: &str) {
    info!(
        session_id = session_id,
        user_id = user_id,
        booking_id = booking_id,
        trip_type = trip_type,
        "Booking confirmed"
    );
}

/// Log provider errors with context
pub fn log_provider_error(provider: &str, error: &str, context: Option<&str>) {
    error!(
        provider = provider,
        error = error,
        context = context,
        "Provider error occurred"
    );
}

/// Log record store operations
pub fn log_store_operation(operation: &str, user_id: i64, duration_ms: u64, success: bool) {
    if success {
        debug!(
            operation = operation,
            user_id = user_id,
            duration_ms = duration_ms,
            "Record store operation completed"
        );
    } else {
        error!(
            operation = operation,
            user_id = user_id,
            duration_ms = duration_ms,
            "Record store operation failed"
        );
    }
}
