//! Traveller record model

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::models::booking::BookingRecord;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserName {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    #[serde(default)]
    pub name: UserName,
    #[serde(default)]
    pub preferred_departure_city: Option<String>,
    #[serde(default)]
    pub preferred_departure_country: Option<String>,
    #[serde(default)]
    pub flights: Vec<BookingRecord>,
    /// Fields this crate does not model, kept so rewrites never drop them
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl UserRecord {
    pub fn new(id: i64, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            name: UserName {
                first_name: Some(first_name.to_string()),
                last_name: Some(last_name.to_string()),
            },
            preferred_departure_city: None,
            preferred_departure_country: None,
            flights: Vec::new(),
            extra: HashMap::new(),
        }
    }

    /// Id the next booking for this user receives
    pub fn next_booking_id(&self) -> i64 {
        self.flights.iter().map(|f| f.id).max().unwrap_or(0) + 1
    }

    pub fn display_name(&self) -> String {
        match (&self.name.first_name, &self.name.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => format!("traveller {}", self.id),
        }
    }
}
