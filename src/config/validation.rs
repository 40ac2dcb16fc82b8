//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use url::Url;
use crate::utils::errors::{TravelBuddyError, Result};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_amadeus_config(&settings.amadeus)?;
    validate_records_config(&settings.records)?;
    validate_session_config(&settings.session)?;
    validate_logging_config(&settings.logging)?;

    if settings.features.redis_sessions {
        validate_redis_config(&settings.redis)?;
    }

    match (&settings.budget, settings.features.budget_lookup) {
        (Some(budget), _) => validate_budget_config(budget)?,
        (None, true) => {
            return Err(TravelBuddyError::Config(
                "Budget lookup is enabled but no budget configuration is set".to_string()
            ));
        }
        (None, false) => {}
    }

    Ok(())
}

/// Validate flight provider configuration
fn validate_amadeus_config(config: &super::AmadeusConfig) -> Result<()> {
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(TravelBuddyError::Config(
            "Flight provider client id and secret are required".to_string()
        ));
    }

    validate_base_url("Flight provider", &config.base_url)?;

    if config.timeout_seconds == 0 {
        return Err(TravelBuddyError::Config(
            "Flight provider timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate budgeting provider configuration
fn validate_budget_config(config: &super::BudgetConfig) -> Result<()> {
    if config.access_token.is_empty() {
        return Err(TravelBuddyError::Config(
            "Budget access token is required".to_string()
        ));
    }

    if config.budget_id.is_empty() || config.category_id.is_empty() {
        return Err(TravelBuddyError::Config(
            "Budget id and travel category id are required".to_string()
        ));
    }

    validate_base_url("Budget provider", &config.base_url)?;

    if config.timeout_seconds == 0 {
        return Err(TravelBuddyError::Config(
            "Budget provider timeout must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(config: &super::RedisConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(TravelBuddyError::Config(
            "Redis URL is required when Redis sessions are enabled".to_string()
        ));
    }

    Ok(())
}

/// Validate record store configuration
fn validate_records_config(config: &super::RecordsConfig) -> Result<()> {
    if config.path.is_empty() {
        return Err(TravelBuddyError::Config(
            "Record store path is required".to_string()
        ));
    }

    Ok(())
}

/// Validate session configuration
fn validate_session_config(config: &super::SessionConfig) -> Result<()> {
    if config.ttl_hours <= 0 {
        return Err(TravelBuddyError::Config(
            "Session TTL must be greater than 0".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(TravelBuddyError::Config(
            "Log level is required".to_string()
        ));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(TravelBuddyError::Config(
            format!("Invalid log level: {}. Valid levels: {:?}", config.level, valid_levels)
        ));
    }

    Ok(())
}

fn validate_base_url(name: &str, base_url: &str) -> Result<()> {
    let parsed = Url::parse(base_url)?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(TravelBuddyError::Config(
            format!("{} base URL must be http or https: {}", name, base_url)
        ));
    }
    Ok(())
}
