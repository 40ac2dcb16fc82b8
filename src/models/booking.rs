//! Booking record model

use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use crate::models::flight::{PricedOffer, Segment};
use crate::utils::errors::{TravelBuddyError, Result};

/// Status written on every booking produced by confirmation
pub const BOOKING_STATUS_CONFIRMED: &str = "CONFIRMED";

/// Currency reported when the provider omits one
pub const DEFAULT_CURRENCY: &str = "USD";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    OneWay,
    RoundTrip,
}

impl TripType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripType::OneWay => "ONE_WAY",
            TripType::RoundTrip => "ROUND_TRIP",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingAmount {
    pub amount: String,
    pub currency: String,
}

/// One direction of a booked trip, summarised by its first segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightLeg {
    pub flight_number: String,
    pub departure_airport: String,
    pub departure_time: String,
    pub arrival_airport: String,
    pub arrival_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

impl From<&Segment> for FlightLeg {
    fn from(segment: &Segment) -> Self {
        Self {
            flight_number: segment.flight_number(),
            departure_airport: segment.departure.iata_code.clone(),
            departure_time: segment.departure.at.clone(),
            arrival_airport: segment.arrival.iata_code.clone(),
            arrival_time: segment.arrival.at.clone(),
            terminal: segment.departure.terminal.clone(),
        }
    }
}

/// Persisted booking; never mutated after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    pub booking_date: String,
    pub status: String,
    pub total_price: BookingAmount,
    pub outbound_flight: FlightLeg,
    pub return_flight: Option<FlightLeg>,
    pub airline: String,
    pub trip_type: TripType,
}

/// Booking waiting for its per-user id
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub booking_date: NaiveDate,
    pub total_price: BookingAmount,
    pub outbound_flight: FlightLeg,
    pub return_flight: Option<FlightLeg>,
    pub airline: String,
    pub trip_type: TripType,
}

impl NewBooking {
    /// Build a booking from the chosen offer.
    ///
    /// Each direction is taken from the first segment of its itinerary only;
    /// connecting flights are not itemised.
    pub fn from_offer(offer: &PricedOffer, booking_date: NaiveDate) -> Result<Self> {
        offer.validate().map_err(TravelBuddyError::InvalidSelection)?;

        let outbound_segment = offer
            .outbound()
            .and_then(|it| it.first_segment())
            .ok_or_else(|| TravelBuddyError::InvalidSelection("offer has no outbound flight".to_string()))?;

        let return_flight = if offer.is_round_trip() {
            offer.inbound().and_then(|it| it.first_segment()).map(FlightLeg::from)
        } else {
            None
        };

        let trip_type = if offer.is_round_trip() {
            TripType::RoundTrip
        } else {
            TripType::OneWay
        };

        Ok(Self {
            booking_date,
            total_price: BookingAmount {
                amount: offer.price.total.clone(),
                currency: offer.price.currency_or(DEFAULT_CURRENCY).to_string(),
            },
            outbound_flight: FlightLeg::from(outbound_segment),
            return_flight,
            airline: outbound_segment.carrier_code.clone(),
            trip_type,
        })
    }

    pub fn into_record(self, id: i64) -> BookingRecord {
        BookingRecord {
            id,
            booking_date: self.booking_date.format("%Y-%m-%d").to_string(),
            status: BOOKING_STATUS_CONFIRMED.to_string(),
            total_price: self.total_price,
            outbound_flight: self.outbound_flight,
            return_flight: self.return_flight,
            airline: self.airline,
            trip_type: self.trip_type,
        }
    }
}
