//! Flight search models
//!
//! Typed shapes for what the flight provider returns: destination
//! suggestions from discovery searches and priced offers from offer searches.

use serde::{Deserialize, Deserializer, Serialize};

/// Price as reported by the provider, kept as the provider's decimal string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    #[serde(deserialize_with = "string_or_number")]
    pub total: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl Price {
    pub fn currency_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.currency.as_deref().unwrap_or(fallback)
    }
}

/// Ranked destination produced by a discovery search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DestinationSuggestion {
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default)]
    pub return_date: Option<String>,
    pub price: Price,
}

/// Bookable offer produced by an offer search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedOffer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub price: Price,
    pub itineraries: Vec<Itinerary>,
}

/// One directional journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub duration: Option<String>,
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    pub carrier_code: String,
    pub number: String,
    #[serde(default)]
    pub number_of_stops: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightEndpoint {
    pub iata_code: String,
    pub at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
}

impl PricedOffer {
    /// Check the offer carries at least one itinerary and no empty itinerary
    pub fn validate(&self) -> Result<(), String> {
        if self.itineraries.is_empty() {
            return Err("offer has no itineraries".to_string());
        }
        if self.itineraries.iter().any(|it| it.segments.is_empty()) {
            return Err("offer has an itinerary without segments".to_string());
        }
        Ok(())
    }

    pub fn outbound(&self) -> Option<&Itinerary> {
        self.itineraries.first()
    }

    pub fn inbound(&self) -> Option<&Itinerary> {
        self.itineraries.get(1)
    }

    pub fn is_round_trip(&self) -> bool {
        self.itineraries.len() > 1
    }
}

impl Itinerary {
    pub fn first_segment(&self) -> Option<&Segment> {
        self.segments.first()
    }

    pub fn last_segment(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// Connections on this journey, not counting technical stops
    pub fn stops(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }
}

impl Segment {
    pub fn flight_number(&self) -> String {
        format!("{}{}", self.carrier_code, self.number)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected price as string or number, got {}",
            other
        ))),
    }
}
