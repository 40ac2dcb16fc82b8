//! Session slot names
//!
//! Every value the assistant keeps between turns lives under one of these keys.

use serde::{Deserialize, Serialize};

pub const DEPARTURE_CITY: &str = "departure_city";
pub const DESTINATION: &str = "destination";
pub const DEPARTURE_DATE: &str = "departureDate";
pub const RETURN_DATE: &str = "returnDate";
pub const NUMBER_OF_PAX: &str = "number_of_pax";
pub const TRAVEL_CLASS: &str = "travel_class";
pub const MAX_PRICE: &str = "max_price";
pub const TRAVEL_BUDGET: &str = "travel_budget";
pub const TRAVEL_TIMEFRAME: &str = "travel_timeframe";
pub const DURATION: &str = "duration";
pub const ONE_WAY: &str = "one_way";
pub const FLIGHT_OFFERS: &str = "flight_offers";
pub const FLIGHT_SUGGESTIONS: &str = "flight_suggestions";
pub const ACTIVE_RESULTS: &str = "active_results";
pub const CURRENT_PAGE: &str = "current_page";
pub const DESTINATION_INDEX: &str = "destination_index";
pub const SELECTED_DESTINATION: &str = "selected_destination";
pub const SELECTED_FLIGHT_INDEX: &str = "selected_flight_index";
pub const TRIP_TYPE: &str = "trip_type";
pub const TRIP_STAGE: &str = "trip_stage";
pub const STATUS: &str = "status";
pub const USER_ID: &str = "user_id";
pub const LAST_BOOKING_ID: &str = "last_booking_id";

/// Slots describing the trip being planned; all of them are cleared on reset
pub const TRIP_SLOTS: &[&str] = &[
    DEPARTURE_CITY,
    DESTINATION,
    DEPARTURE_DATE,
    RETURN_DATE,
    NUMBER_OF_PAX,
    TRAVEL_CLASS,
    MAX_PRICE,
    TRAVEL_BUDGET,
    TRAVEL_TIMEFRAME,
    DURATION,
    ONE_WAY,
    FLIGHT_OFFERS,
    FLIGHT_SUGGESTIONS,
    ACTIVE_RESULTS,
    CURRENT_PAGE,
    DESTINATION_INDEX,
    SELECTED_DESTINATION,
    SELECTED_FLIGHT_INDEX,
    TRIP_TYPE,
    TRIP_STAGE,
    LAST_BOOKING_ID,
];

pub const DEFAULT_NUMBER_OF_PAX: &str = "1";
pub const DEFAULT_TRAVEL_CLASS: &str = "economy";

/// Values a fresh or reset session starts with
pub fn trip_defaults() -> Vec<(&'static str, serde_json::Value)> {
    vec![(NUMBER_OF_PAX, serde_json::Value::from(DEFAULT_NUMBER_OF_PAX))]
}

/// Which stored list the last successful search produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultsKind {
    Suggestions,
    Offers,
}

impl ResultsKind {
    /// Slot holding the list of this kind
    pub fn slot(&self) -> &'static str {
        match self {
            ResultsKind::Suggestions => FLIGHT_SUGGESTIONS,
            ResultsKind::Offers => FLIGHT_OFFERS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultsKind::Suggestions => "suggestions",
            ResultsKind::Offers => "offers",
        }
    }
}

impl std::fmt::Display for ResultsKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
