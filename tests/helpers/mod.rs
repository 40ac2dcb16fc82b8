//! Test helpers module
//!
//! This module provides utilities and helpers for testing the TravelBuddy application.
//! It includes a mock Amadeus server, a scripted flight provider, fixtures and test context setup.

#![allow(dead_code)]

pub mod amadeus_mock;
pub mod stub_provider;
pub mod test_context;
pub mod test_data;

pub use amadeus_mock::*;
pub use stub_provider::*;
pub use test_context::*;
pub use test_data::*;
