//! Trip session management
//!
//! This module holds the per-conversation slot map together with typed
//! accessors for the lists and markers the trip services read back.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc, Duration};
use tracing::warn;

use crate::models::{DestinationSuggestion, PricedOffer};
use crate::state::slots::{self, ResultsKind};
use crate::state::stage::TripStage;
use crate::utils::errors::{OperationStatus, Result};
use crate::utils::helpers::{coerce_i64, value_to_text};

/// Session lifetime when none is configured
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;

/// Conversation session: a flat map of named slots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSession {
    /// Session this state belongs to
    pub session_id: String,
    /// Slot values, any JSON shape
    pub slots: HashMap<String, serde_json::Value>,
    /// When this session expires (for cleanup)
    pub expires_at: Option<DateTime<Utc>>,
    /// When this session was last updated
    pub updated_at: DateTime<Utc>,
}

impl TripSession {
    /// Create a fresh session seeded with the trip defaults
    pub fn new(session_id: &str) -> Self {
        Self::with_ttl(session_id, Duration::hours(DEFAULT_SESSION_TTL_HOURS))
    }

    pub fn with_ttl(session_id: &str, ttl: Duration) -> Self {
        let mut slots = HashMap::new();
        for (key, value) in slots::trip_defaults() {
            slots.insert(key.to_string(), value);
        }

        Self {
            session_id: session_id.to_string(),
            slots,
            expires_at: Some(Utc::now() + ttl),
            updated_at: Utc::now(),
        }
    }

    /// Set a slot
    pub fn set_data<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let json_value = serde_json::to_value(value)?;
        self.slots.insert(key.to_string(), json_value);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Set a slot to an explicit `null`
    pub fn set_null(&mut self, key: &str) {
        self.slots.insert(key.to_string(), serde_json::Value::Null);
        self.updated_at = Utc::now();
    }

    /// Decode a slot; absent and `null` both read as `None`
    pub fn get_data<T: for<'de> Deserialize<'de>>(&self, key: &str) -> Result<Option<T>> {
        match self.slots.get(key) {
            Some(value) if !value.is_null() => {
                let result: T = serde_json::from_value(value.clone())?;
                Ok(Some(result))
            }
            _ => Ok(None),
        }
    }

    pub fn get_value(&self, key: &str) -> Option<&serde_json::Value> {
        self.slots.get(key).filter(|v| !v.is_null())
    }

    /// Slot as trimmed text; numbers and booleans are rendered, blanks read as absent
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.slots.get(key).and_then(value_to_text)
    }

    /// Slot as an integer, accepting numeric strings
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.slots.get(key).and_then(coerce_i64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.slots.get(key)? {
            serde_json::Value::Bool(b) => Some(*b),
            serde_json::Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Some(true),
                "false" | "no" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Remove a slot
    pub fn remove_data(&mut self, key: &str) -> Option<serde_json::Value> {
        self.updated_at = Utc::now();
        self.slots.remove(key)
    }

    /// Whether a slot holds a non-null value
    pub fn has_slot(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Check if session has expired
    pub fn is_expired(&self) -> bool {
        if let Some(expires_at) = self.expires_at {
            Utc::now() > expires_at
        } else {
            false
        }
    }

    /// Push the expiry out to `ttl` from now
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = Some(Utc::now() + ttl);
        self.updated_at = Utc::now();
    }

    pub fn set_expiry(&mut self, expires_at: DateTime<Utc>) {
        self.expires_at = Some(expires_at);
        self.updated_at = Utc::now();
    }

    pub fn stage(&self) -> TripStage {
        self.get_data::<TripStage>(slots::TRIP_STAGE)
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    pub fn set_stage(&mut self, stage: TripStage) -> Result<()> {
        let current = self.stage();
        if !current.can_transition_to(stage) {
            warn!(session_id = %self.session_id, from = %current, to = %stage, "Unusual trip stage transition");
        }
        self.set_data(slots::TRIP_STAGE, stage)
    }

    pub fn set_status(&mut self, status: OperationStatus) -> Result<()> {
        self.set_data(slots::STATUS, status)
    }

    pub fn status(&self) -> Option<OperationStatus> {
        self.get_data(slots::STATUS).ok().flatten()
    }

    pub fn suggestions(&self) -> Result<Option<Vec<DestinationSuggestion>>> {
        self.get_data(slots::FLIGHT_SUGGESTIONS)
    }

    pub fn offers(&self) -> Result<Option<Vec<PricedOffer>>> {
        self.get_data(slots::FLIGHT_OFFERS)
    }

    /// List kind the last successful search produced.
    ///
    /// Sessions written before the marker existed fall back to whichever list is present,
    /// offers first.
    pub fn active_results(&self) -> Option<ResultsKind> {
        if let Ok(Some(kind)) = self.get_data::<ResultsKind>(slots::ACTIVE_RESULTS) {
            return Some(kind);
        }
        if self.has_slot(slots::FLIGHT_OFFERS) {
            Some(ResultsKind::Offers)
        } else if self.has_slot(slots::FLIGHT_SUGGESTIONS) {
            Some(ResultsKind::Suggestions)
        } else {
            None
        }
    }

    pub fn current_page(&self) -> usize {
        self.get_i64(slots::CURRENT_PAGE)
            .filter(|p| *p >= 0)
            .map(|p| p as usize)
            .unwrap_or(0)
    }

    pub fn user_id(&self) -> Option<i64> {
        self.get_i64(slots::USER_ID)
    }

    /// Create a summary of the session for logging
    pub fn summary(&self) -> SessionSummary {
        let mut slot_keys: Vec<String> = self
            .slots
            .iter()
            .filter(|(_, v)| !v.is_null())
            .map(|(k, _)| k.clone())
            .collect();
        slot_keys.sort();

        SessionSummary {
            session_id: self.session_id.clone(),
            stage: self.stage(),
            slot_keys,
            expires_at: self.expires_at,
            updated_at: self.updated_at,
        }
    }
}

/// Session summary for logging and debugging
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub stage: TripStage,
    pub slot_keys: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}
