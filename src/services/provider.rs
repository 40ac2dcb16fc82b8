//! Flight provider contract
//!
//! Two calls reach the outside world: turning free text into a location code
//! and running a search. A search without a destination discovers destinations;
//! a search with one returns priced offers.

use async_trait::async_trait;
use serde::Serialize;

use crate::models::{DestinationSuggestion, PricedOffer};
use crate::state::ResultsKind;
use crate::utils::errors::Result;

/// Resolved search inputs handed to the provider unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchParams {
    pub origin: String,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<i64>,
    pub travel_class: Option<String>,
    pub max_price: Option<i64>,
    pub duration: Option<String>,
    pub one_way: Option<bool>,
}

impl SearchParams {
    /// List kind this search produces
    pub fn kind(&self) -> ResultsKind {
        if self.destination.is_some() {
            ResultsKind::Offers
        } else {
            ResultsKind::Suggestions
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResults {
    Destinations(Vec<DestinationSuggestion>),
    Offers(Vec<PricedOffer>),
}

impl ProviderResults {
    pub fn kind(&self) -> ResultsKind {
        match self {
            ProviderResults::Destinations(_) => ResultsKind::Suggestions,
            ProviderResults::Offers(_) => ResultsKind::Offers,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ProviderResults::Destinations(list) => list.len(),
            ProviderResults::Offers(list) => list.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// External flight data source
#[async_trait]
pub trait FlightProvider: Send + Sync {
    /// Resolve a city or airport name to a location code.
    ///
    /// Fails with `LocationNotFound` when the provider has no match.
    async fn resolve_location(&self, text: &str) -> Result<String>;

    /// Run a discovery or offer search.
    ///
    /// Transport, timeout and decoding failures surface as `ProviderUnavailable`.
    async fn search(&self, params: &SearchParams) -> Result<ProviderResults>;

    /// Check the provider is reachable
    async fn health_check(&self) -> bool {
        true
    }
}
