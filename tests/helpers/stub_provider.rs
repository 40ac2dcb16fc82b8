//! Scripted in-process flight provider
//!
//! Searches answer from a queue of scripted responses, in order. Every call
//! is counted and the last search parameters are kept for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use async_trait::async_trait;

use TravelBuddy::models::{DestinationSuggestion, PricedOffer};
use TravelBuddy::services::{FlightProvider, ProviderResults, SearchParams};
use TravelBuddy::utils::errors::{TravelBuddyError, Result};

#[derive(Debug, Clone)]
enum Scripted {
    Results(ProviderResults),
    Unavailable(String),
}

#[derive(Debug, Default)]
pub struct StubFlightProvider {
    locations: HashMap<String, String>,
    script: Mutex<VecDeque<Scripted>>,
    last_params: Mutex<Option<SearchParams>>,
    search_calls: AtomicUsize,
    location_calls: AtomicUsize,
}

impl StubFlightProvider {
    pub fn new() -> Self {
        Self::default()
            .with_location("Madrid", "MAD")
            .with_location("Paris", "PAR")
    }

    /// Map free text to a code; three-character upper-case codes resolve to themselves
    pub fn with_location(mut self, text: &str, code: &str) -> Self {
        self.locations.insert(text.to_lowercase(), code.to_string());
        self
    }

    pub fn then_destinations(self, list: Vec<DestinationSuggestion>) -> Self {
        self.push(Scripted::Results(ProviderResults::Destinations(list)))
    }

    pub fn then_offers(self, list: Vec<PricedOffer>) -> Self {
        self.push(Scripted::Results(ProviderResults::Offers(list)))
    }

    pub fn then_unavailable(self, reason: &str) -> Self {
        self.push(Scripted::Unavailable(reason.to_string()))
    }

    fn push(self, response: Scripted) -> Self {
        self.script.lock().unwrap().push_back(response);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn location_calls(&self) -> usize {
        self.location_calls.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> Option<SearchParams> {
        self.last_params.lock().unwrap().clone()
    }
}

#[async_trait]
impl FlightProvider for StubFlightProvider {
    async fn resolve_location(&self, text: &str) -> Result<String> {
        self.location_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(code) = self.locations.get(&text.trim().to_lowercase()) {
            return Ok(code.clone());
        }
        let is_code = text.len() == 3 && text.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());
        if is_code {
            Ok(text.to_string())
        } else {
            Err(TravelBuddyError::LocationNotFound { location: text.to_string() })
        }
    }

    async fn search(&self, params: &SearchParams) -> Result<ProviderResults> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_params.lock().unwrap() = Some(params.clone());

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Results(results)) => Ok(results),
            Some(Scripted::Unavailable(reason)) => Err(TravelBuddyError::ProviderUnavailable(reason)),
            None => Ok(match params.destination {
                Some(_) => ProviderResults::Offers(Vec::new()),
                None => ProviderResults::Destinations(Vec::new()),
            }),
        }
    }
}
