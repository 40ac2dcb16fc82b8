//! Conversation handlers module
//!
//! This module contains the orchestration boundary between a conversation
//! transport and the trip services:
//! - Actions parsed from typed lines and button payloads
//! - The assistant that runs one action per session turn
//! - Reply rendering for result pages, selections and bookings

pub mod actions;
pub mod assistant;
pub mod render;

// Re-export commonly used handler types
pub use actions::Action;
pub use assistant::TripAssistant;
pub use render::{Button, Reply};
