//! Conversation actions
//!
//! One `Action` per user turn. Actions arrive either as typed console lines
//! (`select 2`, `set departure_city Madrid`) or as button payloads in the
//! `name:argument` form.

use serde_json::Value;
use crate::utils::errors::{TravelBuddyError, Result};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Search,
    ShowResults,
    ShowMore,
    ShowPrevious,
    /// 0-based index into the destination suggestions
    SelectDestination(String),
    TransitionToBooking,
    /// 1-based option number into the flight offers
    SelectFlight(String),
    ConfirmDetails,
    ConfirmBooking,
    Reset,
    SetSlot(String, Value),
    ResolveTimeframe,
    FetchBudget,
    UsePreferredDeparture,
    ListBookings,
}

impl Action {
    /// Parse a console line or button payload
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let (name, rest) = match input.char_indices().find(|(_, c)| *c == ':' || c.is_whitespace()) {
            Some((pos, c)) => (&input[..pos], input[pos + c.len_utf8()..].trim()),
            None => (input, ""),
        };

        let action = match name.to_lowercase().as_str() {
            "search" => Action::Search,
            "results" | "show" => Action::ShowResults,
            "more" | "next" => Action::ShowMore,
            "previous" | "prev" | "back" => Action::ShowPrevious,
            "destination" => Action::SelectDestination(required(name, rest)?),
            "flight" => Action::SelectFlight(required(name, rest)?),
            "book" => Action::TransitionToBooking,
            "details" => Action::ConfirmDetails,
            "confirm" => Action::ConfirmBooking,
            "reset" => Action::Reset,
            "dates" => Action::ResolveTimeframe,
            "budget" => Action::FetchBudget,
            "home" => Action::UsePreferredDeparture,
            "bookings" => Action::ListBookings,
            "set" => {
                let (key, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| TravelBuddyError::InvalidInput("usage: set <slot> <value>".to_string()))?;
                Action::SetSlot(key.to_string(), slot_value(value.trim()))
            }
            "" => return Err(TravelBuddyError::InvalidInput("empty command".to_string())),
            other => return Err(TravelBuddyError::InvalidInput(format!("unknown command '{}'", other))),
        };

        Ok(action)
    }

    /// Payload that parses back into this action
    pub fn payload(&self) -> String {
        match self {
            Action::SelectDestination(index) => format!("destination:{}", index),
            Action::SelectFlight(option) => format!("flight:{}", option),
            Action::SetSlot(key, value) => format!("set:{} {}", key, value),
            other => other.name().to_string(),
        }
    }

    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::ShowResults => "results",
            Action::ShowMore => "more",
            Action::ShowPrevious => "previous",
            Action::SelectDestination(_) => "destination",
            Action::TransitionToBooking => "book",
            Action::SelectFlight(_) => "flight",
            Action::ConfirmDetails => "details",
            Action::ConfirmBooking => "confirm",
            Action::Reset => "reset",
            Action::SetSlot(..) => "set",
            Action::ResolveTimeframe => "dates",
            Action::FetchBudget => "budget",
            Action::UsePreferredDeparture => "home",
            Action::ListBookings => "bookings",
        }
    }
}

fn required(name: &str, rest: &str) -> Result<String> {
    if rest.is_empty() {
        Err(TravelBuddyError::InvalidInput(format!("usage: {} <number>", name)))
    } else {
        Ok(rest.to_string())
    }
}

/// Numbers, booleans and `null` are stored typed; anything else as text
fn slot_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ (Value::Number(_) | Value::Bool(_) | Value::Null)) => value,
        _ => Value::String(raw.trim_matches('"').to_string()),
    }
}
