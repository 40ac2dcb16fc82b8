//! Traveller profile service
//!
//! Reads the traveller record behind the session's `user_id` for the
//! preferred departure city and the list of past bookings.

use std::sync::Arc;
use tracing::debug;

use crate::database::RecordStore;
use crate::models::{BookingRecord, UserRecord};
use crate::state::{slots, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};

#[derive(Clone)]
pub struct ProfileService {
    records: Arc<dyn RecordStore>,
}

impl ProfileService {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    async fn current_user(&self, session: &TripSession) -> Result<UserRecord> {
        let user_id = session.user_id().ok_or_else(|| TravelBuddyError::MissingRequiredSlot {
            slot: slots::USER_ID.to_string(),
        })?;

        self.records
            .get_user(user_id)
            .await?
            .ok_or_else(|| TravelBuddyError::InvalidInput(format!("no traveller with id {}", user_id)))
    }

    /// Copy the traveller's preferred departure city into `departure_city`
    pub async fn use_preferred_departure(&self, session: &mut TripSession) -> Result<String> {
        let user = self.current_user(session).await?;
        let city = user.preferred_departure_city.ok_or_else(|| TravelBuddyError::MissingRequiredSlot {
            slot: slots::DEPARTURE_CITY.to_string(),
        })?;

        session.set_data(slots::DEPARTURE_CITY, &city)?;
        debug!(session_id = %session.session_id, user_id = user.id, city = %city, "Using preferred departure city");
        Ok(city)
    }

    /// The traveller's bookings, oldest first
    pub async fn list_bookings(&self, session: &TripSession) -> Result<(UserRecord, Vec<BookingRecord>)> {
        let user = self.current_user(session).await?;
        let mut flights = user.flights.clone();
        flights.sort_by_key(|f| f.id);
        Ok((user, flights))
    }
}
