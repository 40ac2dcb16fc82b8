//! TravelBuddy trip planner
//!
//! Session orchestration for a conversational trip-planning assistant.
//! This library provides modular components for flight discovery, paging
//! through results, destination and flight selection, and booking against
//! a shared traveller record store.

#![allow(non_snake_case)]

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{TravelBuddyError, OperationStatus, Result};

// Re-export main components for easy access
pub use database::{RecordStore, JsonRecordStore, MemoryRecordStore};
pub use handlers::{Action, Reply, TripAssistant};
pub use services::ServiceFactory;
pub use state::{SessionStore, TripSession, TripStage};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
