//! Record store contract
//!
//! Traveller records and their bookings are read for defaults and appended
//! to on confirmation. Every implementation serialises `append_booking` so two
//! concurrent confirmations can never overwrite each other.

use std::collections::HashMap;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::models::{BookingRecord, NewBooking, UserRecord};
use crate::utils::errors::{TravelBuddyError, Result};

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn get_user(&self, id: i64) -> Result<Option<UserRecord>>;

    /// Insert or replace a user record
    async fn put_user(&self, user: UserRecord) -> Result<()>;

    /// Read the user, assign the next booking id, append and write back,
    /// all under the store's write lock
    async fn append_booking(&self, user_id: i64, booking: NewBooking) -> Result<BookingRecord>;
}

/// On-disk document shape: `{"users": [...]}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub users: Vec<UserRecord>,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl StoreDocument {
    pub fn find_user(&self, id: i64) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn upsert_user(&mut self, user: UserRecord) {
        match self.users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user,
            None => self.users.push(user),
        }
    }

    /// Append a booking to a user held in this document
    pub fn append_booking(&mut self, user_id: i64, booking: NewBooking) -> Result<BookingRecord> {
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| TravelBuddyError::PersistFailed(format!("user {} not found", user_id)))?;

        let record = booking.into_record(user.next_booking_id());
        user.flights.push(record.clone());
        Ok(record)
    }
}
