//! Flight search orchestration
//!
//! Resolves the search inputs from the session once, up front, runs the
//! provider search and writes the complete result list back before anything
//! is rendered from it.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::database::RecordStore;
use crate::state::{slots, ResultsKind, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::helpers::coerce_i64;
use crate::utils::logging::log_search_result;
use super::provider::{FlightProvider, ProviderResults, SearchParams};

/// Inputs for one search, after applying precedence and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct SearchInputs {
    pub departure_city: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: i64,
    pub travel_class: Option<String>,
    pub max_price: Option<i64>,
    pub duration: Option<String>,
    pub one_way: Option<bool>,
}

impl SearchInputs {
    /// Resolve inputs in precedence order:
    /// `departure_city` then the traveller's preferred departure city,
    /// `max_price` then `travel_budget`, `number_of_pax` then 1.
    pub async fn resolve(session: &TripSession, records: &dyn RecordStore) -> Self {
        let departure_city = match session.get_string(slots::DEPARTURE_CITY) {
            Some(city) => Some(city),
            None => preferred_departure_city(session, records).await,
        };

        let max_price = session
            .get_value(slots::MAX_PRICE)
            .and_then(price_limit)
            .or_else(|| session.get_value(slots::TRAVEL_BUDGET).and_then(price_limit));

        Self {
            departure_city,
            destination: session.get_string(slots::DESTINATION),
            departure_date: session.get_string(slots::DEPARTURE_DATE),
            return_date: session.get_string(slots::RETURN_DATE),
            adults: session.get_i64(slots::NUMBER_OF_PAX).unwrap_or(1),
            travel_class: session.get_string(slots::TRAVEL_CLASS),
            max_price,
            duration: session.get_string(slots::DURATION),
            one_way: session.get_bool(slots::ONE_WAY),
        }
    }

    pub fn kind(&self) -> ResultsKind {
        if self.destination.is_some() {
            ResultsKind::Offers
        } else {
            ResultsKind::Suggestions
        }
    }

    /// Check the inputs the chosen mode cannot run without
    pub fn validate(&self) -> Result<()> {
        if self.departure_city.is_none() {
            return Err(TravelBuddyError::MissingRequiredSlot {
                slot: slots::DEPARTURE_CITY.to_string(),
            });
        }
        if self.kind() == ResultsKind::Offers && self.departure_date.is_none() {
            return Err(TravelBuddyError::MissingRequiredSlot {
                slot: slots::DEPARTURE_DATE.to_string(),
            });
        }
        Ok(())
    }
}

/// Integer price ceiling; fractional budgets are truncated
fn price_limit(value: &serde_json::Value) -> Option<i64> {
    coerce_i64(value).or_else(|| {
        let float = match value {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        float.is_finite().then(|| float.trunc() as i64)
    })
}

async fn preferred_departure_city(session: &TripSession, records: &dyn RecordStore) -> Option<String> {
    let user_id = session.user_id()?;
    match records.get_user(user_id).await {
        Ok(user) => user.and_then(|u| u.preferred_departure_city),
        Err(e) => {
            warn!(session_id = %session.session_id, user_id = user_id, error = %e,
                  "Could not read traveller profile for departure default");
            None
        }
    }
}

/// What a completed search wrote to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Found { kind: ResultsKind, count: usize },
    NotFound { kind: ResultsKind },
}

/// Search orchestrator
#[derive(Clone)]
pub struct SearchService {
    provider: Arc<dyn FlightProvider>,
    records: Arc<dyn RecordStore>,
}

impl SearchService {
    pub fn new(provider: Arc<dyn FlightProvider>, records: Arc<dyn RecordStore>) -> Self {
        Self { provider, records }
    }

    /// Run a discovery or offer search for the session.
    ///
    /// Any error leaves the stored result lists untouched. An empty result
    /// writes a `null` list and is reported as `NotFound`, not as an error.
    pub async fn search(&self, session: &mut TripSession) -> Result<SearchOutcome> {
        let inputs = SearchInputs::resolve(session, self.records.as_ref()).await;
        inputs.validate()?;
        let kind = inputs.kind();

        let departure_city = inputs.departure_city.clone().unwrap_or_default();
        let origin = self.provider.resolve_location(&departure_city).await?;
        let destination = match &inputs.destination {
            Some(text) => Some(self.provider.resolve_location(text).await?),
            None => None,
        };

        let params = SearchParams {
            origin,
            destination,
            departure_date: inputs.departure_date.clone(),
            return_date: inputs.return_date.clone(),
            adults: Some(inputs.adults),
            travel_class: inputs.travel_class.clone(),
            max_price: inputs.max_price,
            duration: inputs.duration.clone(),
            one_way: inputs.one_way,
        };
        debug!(session_id = %session.session_id, params = ?params, "Running flight search");

        let results = self.provider.search(&params).await?;
        log_search_result(&session.session_id, kind.as_str(), results.len());

        if results.is_empty() {
            session.set_null(kind.slot());
            return Ok(SearchOutcome::NotFound { kind });
        }

        let count = results.len();
        match results {
            ProviderResults::Destinations(list) => {
                session.set_data(slots::FLIGHT_SUGGESTIONS, list)?;
            }
            ProviderResults::Offers(list) => {
                session.set_data(slots::FLIGHT_OFFERS, list)?;
            }
        }
        // A flight picked from an earlier list cannot be booked after a new search
        session.remove_data(slots::SELECTED_FLIGHT_INDEX);
        session.set_data(slots::ACTIVE_RESULTS, kind)?;
        session.set_data(slots::CURRENT_PAGE, 0)?;
        let stage = session.stage().after_search(kind);
        session.set_stage(stage)?;

        Ok(SearchOutcome::Found { kind, count })
    }
}
