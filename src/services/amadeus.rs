//! Amadeus flight provider
//!
//! This service handles the Amadeus self-service API: OAuth2 client
//! credentials, location lookup, flight destination discovery and flight
//! offer search. Every failure leaves this module as `ProviderUnavailable`.

use std::time::Duration;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::config::AmadeusConfig;
use crate::models::{DestinationSuggestion, PricedOffer};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::logging::log_provider_error;
use super::provider::{FlightProvider, ProviderResults, SearchParams};

const PROVIDER: &str = "amadeus";
const TOKEN_PATH: &str = "/v1/security/oauth2/token";
const LOCATIONS_PATH: &str = "/v1/reference-data/locations";
const DESTINATIONS_PATH: &str = "/v1/shopping/flight-destinations";
const OFFERS_PATH: &str = "/v2/shopping/flight-offers";

/// Upper bound on offers requested per search
const MAX_OFFERS: u32 = 20;

/// Tokens are refreshed this long before the provider says they expire
const TOKEN_EXPIRY_MARGIN_SECONDS: i64 = 30;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    1799
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
    data: Option<Vec<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Location {
    #[serde(default)]
    iata_code: Option<String>,
}

/// Amadeus API client
pub struct AmadeusClient {
    client: Client,
    config: AmadeusConfig,
    token: RwLock<Option<CachedToken>>,
}

impl AmadeusClient {
    /// Create a new AmadeusClient instance
    pub fn new(config: AmadeusConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("TravelBuddy/1.0")
            .build()
            .map_err(TravelBuddyError::Http)?;

        Ok(Self {
            client,
            config,
            token: RwLock::new(None),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Bearer token, fetched once and reused until shortly before expiry
    async fn access_token(&self) -> Result<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if token.is_valid() {
                return Ok(token.value.clone());
            }
        }

        let mut slot = self.token.write().await;
        // Another caller may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref() {
            if token.is_valid() {
                return Ok(token.value.clone());
            }
        }

        debug!("Requesting Amadeus access token");
        let response = self
            .client
            .post(self.url(TOKEN_PATH))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| transport_error(e, "token"))?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), "token"));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| decode_error(e.to_string(), "token"))?;

        let lifetime = (token.expires_in - TOKEN_EXPIRY_MARGIN_SECONDS).max(0);
        let cached = CachedToken {
            value: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(lifetime),
        };
        info!(expires_at = %cached.expires_at, "Obtained Amadeus access token");

        let value = cached.value.clone();
        *slot = Some(cached);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    /// GET an endpoint returning a `data` array; 404 reads as an empty list
    async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        context: &str,
    ) -> Result<Vec<T>> {
        let token = self.access_token().await?;

        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| transport_error(e, context))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!(context = context, "Provider returned 404, treating as no results");
                return Ok(Vec::new());
            }
            StatusCode::UNAUTHORIZED => {
                self.invalidate_token().await;
                return Err(status_error(StatusCode::UNAUTHORIZED, context));
            }
            status if !status.is_success() => return Err(status_error(status, context)),
            _ => {}
        }

        let body = response
            .text()
            .await
            .map_err(|e| transport_error(e, context))?;

        let envelope: DataEnvelope<T> = serde_json::from_str(&body)
            .map_err(|e| decode_error(e.to_string(), context))?;

        Ok(envelope.data.unwrap_or_default())
    }

    async fn search_destinations(&self, params: &SearchParams) -> Result<Vec<DestinationSuggestion>> {
        let mut query = vec![("origin", params.origin.to_uppercase())];
        if let Some(date) = &params.departure_date {
            query.push(("departureDate", date.clone()));
        }
        if let Some(duration) = &params.duration {
            query.push(("duration", duration.clone()));
        }
        if let Some(one_way) = params.one_way {
            query.push(("oneWay", one_way.to_string()));
        }
        if let Some(max_price) = params.max_price {
            query.push(("maxPrice", max_price.to_string()));
        }

        self.get_list(DESTINATIONS_PATH, &query, "flight-destinations").await
    }

    async fn search_offers(&self, params: &SearchParams, destination: &str) -> Result<Vec<PricedOffer>> {
        let mut query = vec![
            ("originLocationCode", params.origin.to_uppercase()),
            ("destinationLocationCode", destination.to_uppercase()),
            ("adults", params.adults.unwrap_or(1).to_string()),
            ("max", MAX_OFFERS.to_string()),
        ];
        if let Some(date) = &params.departure_date {
            query.push(("departureDate", date.clone()));
        }
        if let Some(date) = &params.return_date {
            query.push(("returnDate", date.clone()));
        }
        if let Some(class) = &params.travel_class {
            query.push(("travelClass", class.trim().to_uppercase().replace(' ', "_")));
        }
        if let Some(max_price) = params.max_price {
            query.push(("maxPrice", max_price.to_string()));
        }
        if let Some(currency) = &self.config.currency {
            query.push(("currencyCode", currency.clone()));
        }

        let offers: Vec<PricedOffer> = self.get_list(OFFERS_PATH, &query, "flight-offers").await?;
        for offer in &offers {
            offer
                .validate()
                .map_err(|e| decode_error(e, "flight-offers"))?;
        }
        Ok(offers)
    }
}

#[async_trait]
impl FlightProvider for AmadeusClient {
    async fn resolve_location(&self, text: &str) -> Result<String> {
        let keyword = text.trim();
        if keyword.is_empty() {
            return Err(TravelBuddyError::LocationNotFound { location: text.to_string() });
        }

        let query = [
            ("keyword", keyword.to_string()),
            ("subType", "AIRPORT,CITY".to_string()),
        ];
        let locations: Vec<Location> = self.get_list(LOCATIONS_PATH, &query, "locations").await?;

        match locations.into_iter().find_map(|l| l.iata_code) {
            Some(code) => {
                debug!(location = %keyword, code = %code, "Resolved location code");
                Ok(code)
            }
            None => {
                warn!(location = %keyword, "No location code found");
                Err(TravelBuddyError::LocationNotFound { location: keyword.to_string() })
            }
        }
    }

    async fn search(&self, params: &SearchParams) -> Result<ProviderResults> {
        match &params.destination {
            Some(destination) => Ok(ProviderResults::Offers(
                self.search_offers(params, destination).await?,
            )),
            None => Ok(ProviderResults::Destinations(
                self.search_destinations(params).await?,
            )),
        }
    }

    async fn health_check(&self) -> bool {
        self.access_token().await.is_ok()
    }
}

impl std::fmt::Debug for AmadeusClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AmadeusClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

fn transport_error(e: reqwest::Error, context: &str) -> TravelBuddyError {
    let message = if e.is_timeout() {
        "request timed out".to_string()
    } else if e.is_connect() {
        "connection failed".to_string()
    } else {
        e.to_string()
    };
    log_provider_error(PROVIDER, &message, Some(context));
    TravelBuddyError::ProviderUnavailable(message)
}

fn status_error(status: StatusCode, context: &str) -> TravelBuddyError {
    let message = format!("HTTP {}", status);
    log_provider_error(PROVIDER, &message, Some(context));
    TravelBuddyError::ProviderUnavailable(message)
}

fn decode_error(detail: String, context: &str) -> TravelBuddyError {
    let message = format!("malformed response: {}", detail);
    log_provider_error(PROVIDER, &message, Some(context));
    TravelBuddyError::ProviderUnavailable(message)
}
