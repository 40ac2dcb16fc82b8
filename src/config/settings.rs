//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub amadeus: AmadeusConfig,
    pub budget: Option<BudgetConfig>,
    pub redis: RedisConfig,
    pub records: RecordsConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub features: FeaturesConfig,
}

/// Flight data provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AmadeusConfig {
    pub client_id: String,
    pub client_secret: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    pub currency: Option<String>,
}

/// Budgeting provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BudgetConfig {
    pub access_token: String,
    pub budget_id: String,
    pub category_id: String,
    pub base_url: String,
    pub timeout_seconds: u64,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RedisConfig {
    pub url: String,
    pub prefix: String,
    pub ttl_seconds: u64,
}

/// Record store configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordsConfig {
    pub path: String,
}

/// Conversation session configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub ttl_hours: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: String,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub redis_sessions: bool,
    pub budget_lookup: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    ///
    /// Values from `config.toml` are overridden by `TRAVELBUDDY__SECTION__KEY`
    /// environment variables, on top of the development defaults.
    pub fn new() -> Result<Self, config::ConfigError> {
        let defaults = config::Config::try_from(&Settings::default())?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("TRAVELBUDDY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::TravelBuddyError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            amadeus: AmadeusConfig {
                client_id: String::new(),
                client_secret: String::new(),
                base_url: "https://test.api.amadeus.com".to_string(),
                timeout_seconds: 15,
                currency: None,
            },
            budget: None,
            redis: RedisConfig {
                url: "redis://localhost:6379".to_string(),
                prefix: "travelbuddy:".to_string(),
                ttl_seconds: 3600,
            },
            records: RecordsConfig {
                path: "db/database.json".to_string(),
            },
            session: SessionConfig {
                ttl_hours: 24,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: "logs".to_string(),
            },
            features: FeaturesConfig {
                redis_sessions: false,
                budget_lookup: false,
            },
        }
    }
}
