//! Selection and booking
//!
//! Drives a session from a shown result list to a confirmed booking.
//! Destination suggestions are picked by 0-based index, priced offers by
//! 1-based option number. Every step re-reads the current lists rather than
//! trusting what an earlier step cached.

use std::sync::Arc;
use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};

use crate::database::RecordStore;
use crate::models::{BookingRecord, DestinationSuggestion, NewBooking, PricedOffer};
use crate::state::{slots, ResultsKind, TripSession, TripStage};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::helpers::coerce_i64;
use crate::utils::logging::log_booking;

/// What a selection picked
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Destination { index: usize, suggestion: DestinationSuggestion },
    Flight { option: usize, offer: PricedOffer },
}

/// Booking slots echoed back for the traveller to confirm
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingSummary {
    pub departure_city: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub number_of_pax: String,
}

fn parse_index(raw: &str) -> Result<i64> {
    coerce_i64(&serde_json::Value::String(raw.to_string()))
        .ok_or_else(|| TravelBuddyError::InvalidSelection(format!("'{}' is not a number", raw.trim())))
}

/// Select from whichever list the last search produced
pub fn select(session: &mut TripSession, raw: &str) -> Result<Selection> {
    match session.active_results() {
        Some(ResultsKind::Offers) => select_flight(session, raw),
        Some(ResultsKind::Suggestions) => select_destination(session, raw),
        None => Err(TravelBuddyError::InvalidSelection("there are no results to choose from".to_string())),
    }
}

/// Pick a destination suggestion by its 0-based index.
///
/// Copies the suggestion's destination and dates into the booking slots.
/// On failure `selected_destination` is left as it was.
pub fn select_destination(session: &mut TripSession, raw: &str) -> Result<Selection> {
    let index = parse_index(raw)?;
    let suggestions = session.suggestions()?.unwrap_or_default();
    if suggestions.is_empty() {
        return Err(TravelBuddyError::InvalidSelection("there are no destinations to choose from".to_string()));
    }
    if index < 0 || index as usize >= suggestions.len() {
        return Err(TravelBuddyError::InvalidSelection(format!(
            "destination {} is not between 0 and {}",
            index,
            suggestions.len() - 1
        )));
    }

    let index = index as usize;
    let suggestion = suggestions[index].clone();

    session.set_data(slots::DESTINATION_INDEX, index)?;
    session.set_data(slots::SELECTED_DESTINATION, &suggestion)?;
    copy_trip_fields(session, &suggestion)?;
    session.set_stage(TripStage::DestinationSelected)?;

    debug!(session_id = %session.session_id, index = index, destination = %suggestion.destination,
           "Destination selected");
    Ok(Selection::Destination { index, suggestion })
}

/// Pick a priced offer by its 1-based option number
pub fn select_flight(session: &mut TripSession, raw: &str) -> Result<Selection> {
    let option = parse_index(raw)?;
    let offers = session.offers()?.unwrap_or_default();
    if offers.is_empty() {
        return Err(TravelBuddyError::InvalidSelection("there are no flight offers to choose from".to_string()));
    }
    if option < 1 || option as usize > offers.len() {
        return Err(TravelBuddyError::InvalidSelection(format!(
            "option {} is not between 1 and {}",
            option,
            offers.len()
        )));
    }

    let option = option as usize;
    let offer = offers[option - 1].clone();

    session.set_data(slots::SELECTED_FLIGHT_INDEX, option)?;
    session.set_stage(TripStage::BookingConfirmPending)?;

    debug!(session_id = %session.session_id, option = option, price = %offer.price.total, "Flight offer selected");
    Ok(Selection::Flight { option, offer })
}

fn copy_trip_fields(session: &mut TripSession, suggestion: &DestinationSuggestion) -> Result<()> {
    session.set_data(slots::DESTINATION, &suggestion.destination)?;
    session.set_data(slots::DEPARTURE_DATE, &suggestion.departure_date)?;
    match &suggestion.return_date {
        Some(date) => session.set_data(slots::RETURN_DATE, date)?,
        None => session.set_null(slots::RETURN_DATE),
    }
    Ok(())
}

/// Move a selected destination into the booking flow.
///
/// The selection must still be part of the current suggestion list; a
/// selection left over from a superseded search fails with `NoSelection`.
pub fn transition_to_booking(session: &mut TripSession) -> Result<DestinationSuggestion> {
    let selected: DestinationSuggestion = session
        .get_data(slots::SELECTED_DESTINATION)?
        .ok_or(TravelBuddyError::NoSelection)?;

    let current = session.suggestions()?.unwrap_or_default();
    if !current.contains(&selected) {
        debug!(session_id = %session.session_id, "Selected destination is not in the current results");
        return Err(TravelBuddyError::NoSelection);
    }

    copy_trip_fields(session, &selected)?;
    if !session.has_slot(slots::NUMBER_OF_PAX) {
        session.set_data(slots::NUMBER_OF_PAX, slots::DEFAULT_NUMBER_OF_PAX)?;
    }
    if !session.has_slot(slots::TRAVEL_CLASS) {
        session.set_data(slots::TRAVEL_CLASS, slots::DEFAULT_TRAVEL_CLASS)?;
    }
    let trip_type = if selected.return_date.is_some() { "round-trip" } else { "one-way" };
    session.set_data(slots::TRIP_TYPE, trip_type)?;
    session.set_stage(TripStage::BookingConfirmPending)?;

    Ok(selected)
}

/// Echo the booking slots back without changing anything
pub fn confirm_details(session: &TripSession) -> BookingSummary {
    BookingSummary {
        departure_city: session.get_string(slots::DEPARTURE_CITY),
        destination: session.get_string(slots::DESTINATION),
        departure_date: session.get_string(slots::DEPARTURE_DATE),
        return_date: session.get_string(slots::RETURN_DATE),
        number_of_pax: session
            .get_string(slots::NUMBER_OF_PAX)
            .unwrap_or_else(|| slots::DEFAULT_NUMBER_OF_PAX.to_string()),
    }
}

/// Booking state machine over a record store
#[derive(Clone)]
pub struct BookingService {
    records: Arc<dyn RecordStore>,
}

impl BookingService {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Book the selected offer for the session's traveller.
    ///
    /// Offers can only be booked while they are the active result list. On
    /// success the offer list is cleared, so confirming again fails with
    /// `NoOffers` until a new offer search runs. On failure no slot changes.
    pub async fn confirm_booking(&self, session: &mut TripSession) -> Result<BookingRecord> {
        if session.active_results() != Some(ResultsKind::Offers) {
            return Err(TravelBuddyError::NoOffers);
        }
        let offers = session
            .offers()?
            .filter(|o| !o.is_empty())
            .ok_or(TravelBuddyError::NoOffers)?;

        let option = session
            .get_i64(slots::SELECTED_FLIGHT_INDEX)
            .ok_or_else(|| TravelBuddyError::InvalidSelection("no flight option selected".to_string()))?;
        if option < 1 || option as usize > offers.len() {
            return Err(TravelBuddyError::InvalidSelection(format!(
                "option {} is not between 1 and {}",
                option,
                offers.len()
            )));
        }
        let offer = &offers[option as usize - 1];

        let user_id = session.user_id().ok_or_else(|| TravelBuddyError::MissingRequiredSlot {
            slot: slots::USER_ID.to_string(),
        })?;

        let booking = NewBooking::from_offer(offer, Utc::now().date_naive())?;
        let record = self
            .records
            .append_booking(user_id, booking)
            .await
            .map_err(|e| match e {
                TravelBuddyError::PersistFailed(_) => e,
                other => TravelBuddyError::PersistFailed(other.to_string()),
            })?;

        session.set_null(slots::FLIGHT_OFFERS);
        session.remove_data(slots::SELECTED_FLIGHT_INDEX);
        session.set_data(slots::LAST_BOOKING_ID, record.id)?;
        session.set_stage(TripStage::Booked)?;

        log_booking(&session.session_id, user_id, record.id, record.trip_type.as_str());
        info!(session_id = %session.session_id, user_id = user_id, amount = %record.total_price.amount,
              "Booking stored");
        Ok(record)
    }
}
