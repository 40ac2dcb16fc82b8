//! State management module
//!
//! This module handles trip sessions, their slots and planning stage,
//! and where sessions are stored between turns.

pub mod context;
pub mod slots;
pub mod stage;
pub mod storage;

// Re-export commonly used state components
pub use context::{TripSession, SessionSummary};
pub use slots::ResultsKind;
pub use stage::TripStage;
pub use storage::{SessionStore, RedisSessionStore, MemorySessionStore};
