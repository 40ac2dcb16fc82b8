//! Test data helpers for creating trip fixtures
//!
//! Builders for destination suggestions, priced offers (one way and round
//! trip) and traveller records with existing bookings.

use chrono::NaiveDate;
use serde_json::{json, Value};
use TravelBuddy::models::{DestinationSuggestion, NewBooking, PricedOffer, UserRecord};

pub fn suggestion_json(destination: &str, price: &str) -> Value {
    json!({
        "type": "flight-destination",
        "origin": "MAD",
        "destination": destination,
        "departureDate": "2024-07-01",
        "returnDate": "2024-07-08",
        "price": {"total": price}
    })
}

pub fn create_suggestion(destination: &str, price: &str) -> DestinationSuggestion {
    serde_json::from_value(suggestion_json(destination, price)).expect("valid suggestion fixture")
}

/// `count` suggestions with distinct destinations D00, D01, ...
pub fn create_suggestions(count: usize) -> Vec<DestinationSuggestion> {
    (0..count)
        .map(|i| create_suggestion(&format!("D{:02}", i), &format!("{}.00", 100 + i)))
        .collect()
}

fn segment_json(from: &str, to: &str, departure: &str, arrival: &str, carrier: &str, number: &str) -> Value {
    json!({
        "departure": {"iataCode": from, "at": departure, "terminal": "4"},
        "arrival": {"iataCode": to, "at": arrival},
        "carrierCode": carrier,
        "number": number,
        "numberOfStops": 0
    })
}

pub fn one_way_offer_json(price: &str) -> Value {
    json!({
        "type": "flight-offer",
        "id": "1",
        "price": {"total": price, "currency": "EUR"},
        "itineraries": [{
            "duration": "PT2H20M",
            "segments": [segment_json("MAD", "CDG", "2024-07-01T07:10:00", "2024-07-01T09:30:00", "IB", "3402")]
        }]
    })
}

pub fn round_trip_offer_json(price: &str) -> Value {
    json!({
        "type": "flight-offer",
        "id": "2",
        "price": {"total": price, "currency": "EUR"},
        "itineraries": [
            {
                "duration": "PT4H05M",
                "segments": [
                    segment_json("MAD", "LHR", "2024-07-01T06:00:00", "2024-07-01T07:25:00", "BA", "459"),
                    segment_json("LHR", "CDG", "2024-07-01T09:00:00", "2024-07-01T11:05:00", "BA", "304")
                ]
            },
            {
                "duration": "PT2H10M",
                "segments": [segment_json("CDG", "MAD", "2024-07-08T20:15:00", "2024-07-08T22:25:00", "AF", "1000")]
            }
        ]
    })
}

pub fn create_one_way_offer(price: &str) -> PricedOffer {
    serde_json::from_value(one_way_offer_json(price)).expect("valid offer fixture")
}

pub fn create_round_trip_offer(price: &str) -> PricedOffer {
    serde_json::from_value(round_trip_offer_json(price)).expect("valid offer fixture")
}

pub fn booking_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Traveller with one booking per id in `booking_ids`
pub fn create_user(id: i64, booking_ids: &[i64]) -> UserRecord {
    let mut user = UserRecord::new(id, "Ana", "Silva");
    user.preferred_departure_city = Some("Madrid".to_string());
    for booking_id in booking_ids {
        let booking = NewBooking::from_offer(&create_one_way_offer("80.00"), booking_date())
            .expect("valid booking fixture");
        user.flights.push(booking.into_record(*booking_id));
    }
    user
}
