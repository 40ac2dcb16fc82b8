//! Mock Amadeus API server for testing
//!
//! This module provides a mock HTTP server that simulates the Amadeus
//! self-service API. It uses wiremock to create configurable mock responses.

use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};
use TravelBuddy::config::AmadeusConfig;

pub const TEST_TOKEN: &str = "test-access-token";

/// Mock Amadeus API server for testing
pub struct AmadeusMockServer {
    pub server: MockServer,
}

impl AmadeusMockServer {
    /// Create a new mock Amadeus API server
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Client configuration pointing at this server
    pub fn config(&self) -> AmadeusConfig {
        AmadeusConfig {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            base_url: self.server.uri(),
            timeout_seconds: 1,
            currency: None,
        }
    }

    /// Setup the token endpoint, expecting exactly `times` requests
    pub async fn mock_token(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/security/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "type": "amadeusOAuth2Token",
                "access_token": TEST_TOKEN,
                "token_type": "Bearer",
                "expires_in": 1799
            })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Setup a location lookup; `None` answers with an empty `data` array
    pub async fn mock_location(&self, keyword: &str, code: Option<&str>) {
        let data = match code {
            Some(code) => json!([{"type": "location", "subType": "CITY", "iataCode": code}]),
            None => json!([]),
        };

        Mock::given(method("GET"))
            .and(path("/v1/reference-data/locations"))
            .and(query_param("keyword", keyword))
            .and(query_param("subType", "AIRPORT,CITY"))
            .and(header("authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_destinations(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v1/shopping/flight-destinations"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    pub async fn mock_offers(&self, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/v2/shopping/flight-offers"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Successful response wrapping `data`
    pub fn data(data: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
    }
}
