//! Error handling for TravelBuddy
//!
//! This module defines the main error type used throughout the application
//! and the session status flags every error is reported as.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for TravelBuddy application
#[derive(Error, Debug)]
pub enum TravelBuddyError {
    #[error("Missing required slot: {slot}")]
    MissingRequiredSlot { slot: String },

    #[error("No location code found for {location}")]
    LocationNotFound { location: String },

    #[error("Flight provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("No flights found matching the criteria")]
    NotFound,

    #[error("No results to show")]
    NoResults,

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("No destination selected")]
    NoSelection,

    #[error("No flight offers to book")]
    NoOffers,

    #[error("Failed to persist booking: {0}")]
    PersistFailed(String),

    #[error("Budget provider unavailable: {0}")]
    BudgetUnavailable(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for TravelBuddy operations
pub type Result<T> = std::result::Result<T, TravelBuddyError>;

/// Status flag written to the session after every operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Success,
    Failure,
    NoFlightsFound,
    Error,
}

impl OperationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationStatus::Success => "success",
            OperationStatus::Failure => "failure",
            OperationStatus::NoFlightsFound => "no_flights_found",
            OperationStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TravelBuddyError {
    /// Session status flag this error is reported as
    pub fn status(&self) -> OperationStatus {
        match self {
            TravelBuddyError::NotFound => OperationStatus::NoFlightsFound,
            TravelBuddyError::MissingRequiredSlot { .. }
            | TravelBuddyError::LocationNotFound { .. }
            | TravelBuddyError::NoResults
            | TravelBuddyError::InvalidSelection(_)
            | TravelBuddyError::NoSelection
            | TravelBuddyError::NoOffers
            | TravelBuddyError::BudgetUnavailable(_)
            | TravelBuddyError::InvalidInput(_) => OperationStatus::Failure,
            _ => OperationStatus::Error,
        }
    }

    /// Check if the user can recover by adjusting input and retrying
    pub fn is_recoverable(&self) -> bool {
        match self {
            TravelBuddyError::MissingRequiredSlot { .. } => true,
            TravelBuddyError::LocationNotFound { .. } => true,
            TravelBuddyError::ProviderUnavailable(_) => true,
            TravelBuddyError::NotFound => true,
            TravelBuddyError::NoResults => true,
            TravelBuddyError::InvalidSelection(_) => true,
            TravelBuddyError::NoSelection => true,
            TravelBuddyError::NoOffers => true,
            TravelBuddyError::PersistFailed(_) => false,
            TravelBuddyError::BudgetUnavailable(_) => true,
            TravelBuddyError::Config(_) => false,
            TravelBuddyError::Redis(_) => true,
            TravelBuddyError::Http(_) => true,
            TravelBuddyError::Serialization(_) => false,
            TravelBuddyError::Io(_) => true,
            TravelBuddyError::UrlParse(_) => false,
            TravelBuddyError::InvalidInput(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TravelBuddyError::Config(_) => ErrorSeverity::Critical,
            TravelBuddyError::PersistFailed(_) => ErrorSeverity::Critical,
            TravelBuddyError::ProviderUnavailable(_) => ErrorSeverity::Warning,
            TravelBuddyError::BudgetUnavailable(_) => ErrorSeverity::Warning,
            TravelBuddyError::Redis(_) => ErrorSeverity::Error,
            TravelBuddyError::Http(_) => ErrorSeverity::Error,
            TravelBuddyError::Serialization(_) => ErrorSeverity::Error,
            TravelBuddyError::Io(_) => ErrorSeverity::Error,
            TravelBuddyError::UrlParse(_) => ErrorSeverity::Error,
            _ => ErrorSeverity::Info,
        }
    }

    /// Message suitable for showing to the traveller
    pub fn user_message(&self) -> String {
        match self {
            TravelBuddyError::MissingRequiredSlot { slot } => match slot.as_str() {
                "departure_city" => "I need to know where you're flying from. Which city are you departing from?".to_string(),
                "departureDate" => "I need a departure date to search for flights.".to_string(),
                "user_id" => "I couldn't identify your user account. Please log in first.".to_string(),
                other => format!("I'm missing some information ({}) to continue.", other),
            },
            TravelBuddyError::LocationNotFound { location } => {
                format!("Couldn't find an airport code for {}", location)
            }
            TravelBuddyError::ProviderUnavailable(_) => {
                "I'm having trouble reaching the flight database right now. Please try again later.".to_string()
            }
            TravelBuddyError::NotFound => {
                "I couldn't find any flights matching your criteria. Would you like to adjust your preferences?".to_string()
            }
            TravelBuddyError::NoResults => {
                "I don't have any flight results to show you. Let's search for flights first.".to_string()
            }
            TravelBuddyError::InvalidSelection(_) => {
                "I couldn't find that option in the results. Please pick one of the options shown.".to_string()
            }
            TravelBuddyError::NoSelection => {
                "You need to select a destination first before booking.".to_string()
            }
            TravelBuddyError::NoOffers => {
                "I don't have any flight offers to book. Let's search for flights first.".to_string()
            }
            TravelBuddyError::PersistFailed(_) => {
                "Sorry, I couldn't save your booking. Nothing was booked.".to_string()
            }
            TravelBuddyError::BudgetUnavailable(_) => {
                "Sorry, I couldn't access your budget information. Please check your configuration.".to_string()
            }
            TravelBuddyError::InvalidInput(detail) => {
                format!("I couldn't understand that: {}", detail)
            }
            _ => "Something went wrong on my side. Please try again.".to_string(),
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
