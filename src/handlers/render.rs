//! Reply rendering
//!
//! Pure formatting over page slices and records. Nothing here touches the
//! session.

use chrono::{DateTime, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::models::{BookingRecord, DestinationSuggestion, Itinerary, PricedOffer, UserRecord, DEFAULT_CURRENCY};
use crate::services::booking::BookingSummary;
use crate::services::pagination::{PageItems, PageView};
use crate::utils::errors::{OperationStatus, TravelBuddyError};
use crate::utils::helpers::{format_iso_duration, truncate_text};
use super::actions::Action;

/// Longest city or airport name shown on a card
const MAX_PLACE_LENGTH: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn new(title: impl Into<String>, action: Action) -> Self {
        Self {
            title: title.into(),
            payload: action.payload(),
        }
    }
}

/// What the traveller sees after one action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub text: String,
    pub buttons: Vec<Button>,
    pub status: OperationStatus,
}

impl Reply {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
            status: OperationStatus::Success,
        }
    }

    pub fn with_status(mut self, status: OperationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_buttons(mut self, buttons: Vec<Button>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn from_error(error: &TravelBuddyError) -> Self {
        Self {
            text: error.user_message(),
            buttons: Vec::new(),
            status: error.status(),
        }
    }
}

/// Icon for the time of day: sunrise, daytime or night
pub fn day_part_icon(hour: u32) -> &'static str {
    match hour {
        5..=7 => "🌅",
        8..=18 => "☀️",
        _ => "🌙",
    }
}

pub fn stops_text(stops: usize) -> String {
    match stops {
        0 => "Direct".to_string(),
        1 => "1 stop".to_string(),
        n => format!("{} stops", n),
    }
}

fn parse_time(at: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(at, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(at).ok().map(|dt| dt.naive_local()))
}

pub fn render_suggestion(position: usize, suggestion: &DestinationSuggestion) -> String {
    format!(
        "✈️ Flight {}\n🛫 From: {} 🛬 To: {}\n📅 Depart: {}\n📅 Return: {}\n💰 Price: {} {}",
        position,
        truncate_text(&suggestion.origin, MAX_PLACE_LENGTH),
        truncate_text(&suggestion.destination, MAX_PLACE_LENGTH),
        suggestion.departure_date,
        suggestion.return_date.as_deref().unwrap_or("open"),
        suggestion.price.currency_or(DEFAULT_CURRENCY),
        suggestion.price.total
    )
}

fn render_itinerary(itinerary: &Itinerary) -> Option<String> {
    let first = itinerary.first_segment()?;
    let last = itinerary.last_segment()?;
    let departure = parse_time(&first.departure.at)?;
    let arrival = parse_time(&last.arrival.at)?;

    let duration = itinerary
        .duration
        .as_deref()
        .map(format_iso_duration)
        .unwrap_or_default();

    Some(format!(
        "✈️ {} → {}, 🛑 {}\n📅 {}\n⏰ {} {} → {} {} ({})",
        first.departure.iata_code,
        last.arrival.iata_code,
        stops_text(itinerary.stops()),
        departure.format("%b %d, %Y"),
        day_part_icon(departure.hour()),
        departure.format("%H:%M"),
        day_part_icon(arrival.hour()),
        arrival.format("%H:%M"),
        duration
    ))
}

pub fn render_offer(option: usize, offer: &PricedOffer) -> String {
    let outbound = match offer.outbound().and_then(render_itinerary) {
        Some(text) => text,
        None => return format!("Option {}: No flight details available", option),
    };

    let mut text = format!(
        "Option {}, 💰 {} {}\n{}",
        option,
        offer.price.currency_or(DEFAULT_CURRENCY),
        offer.price.total,
        outbound
    );
    if let Some(inbound) = offer.inbound().and_then(render_itinerary) {
        text.push_str("\n🔄 Return:\n");
        text.push_str(&inbound);
    }
    text
}

/// Cards and buttons for one page of results
pub fn render_page(view: &PageView) -> Reply {
    let mut cards = Vec::with_capacity(view.len());
    let mut buttons = Vec::new();

    let header = match &view.items {
        PageItems::Suggestions(items) => {
            for (offset, suggestion) in items.iter().enumerate() {
                let index = view.start + offset;
                cards.push(render_suggestion(index + 1, suggestion));
                let title = if view.total == 1 {
                    "Select this destination".to_string()
                } else {
                    format!("Select Flight {}", index + 1)
                };
                buttons.push(Button::new(title, Action::SelectDestination(index.to_string())));
            }
            "These are some flight suggestions for you:"
        }
        PageItems::Offers(items) => {
            for (offset, offer) in items.iter().enumerate() {
                let option = view.start + offset + 1;
                cards.push(render_offer(option, offer));
                buttons.push(Button::new(format!("Select Flight {}", option), Action::SelectFlight(option.to_string())));
            }
            "Here are the flight options I found:"
        }
    };

    if view.has_previous {
        buttons.push(Button::new("Previous Options", Action::ShowPrevious));
    }
    if view.has_more {
        buttons.push(Button::new("See More Options", Action::ShowMore));
    }

    Reply::success(format!("{}\n\n{}", header, cards.join("\n\n"))).with_buttons(buttons)
}

pub fn render_summary(summary: &BookingSummary) -> String {
    let unknown = "not set";
    format!(
        "Please confirm your trip:\n🛫 From: {}\n🛬 To: {}\n📅 Depart: {}\n📅 Return: {}\n👥 Passengers: {}",
        summary.departure_city.as_deref().unwrap_or(unknown),
        summary.destination.as_deref().unwrap_or(unknown),
        summary.departure_date.as_deref().unwrap_or(unknown),
        summary.return_date.as_deref().unwrap_or("one way"),
        summary.number_of_pax
    )
}

pub fn render_booking(booking: &BookingRecord) -> String {
    let outbound = &booking.outbound_flight;
    let mut text = format!(
        "Booking #{} ({}) on {}\n✈️ {} {} → {} at {}\n💰 {} {}",
        booking.id,
        booking.status,
        booking.booking_date,
        outbound.flight_number,
        outbound.departure_airport,
        outbound.arrival_airport,
        outbound.departure_time,
        booking.total_price.currency,
        booking.total_price.amount
    );
    if let Some(inbound) = &booking.return_flight {
        text.push_str(&format!(
            "\n🔄 {} {} → {} at {}",
            inbound.flight_number, inbound.departure_airport, inbound.arrival_airport, inbound.departure_time
        ));
    }
    text
}

pub fn render_bookings(user: &UserRecord, bookings: &[BookingRecord]) -> String {
    if bookings.is_empty() {
        return format!("{} has no bookings yet.", user.display_name());
    }

    let cards: Vec<String> = bookings.iter().map(render_booking).collect();
    format!("Bookings for {}:\n\n{}", user.display_name(), cards.join("\n\n"))
}
