//! Record store module
//!
//! This module holds traveller records and their bookings.

pub mod json;
pub mod memory;
pub mod store;

pub use json::JsonRecordStore;
pub use memory::MemoryRecordStore;
pub use store::{RecordStore, StoreDocument};
