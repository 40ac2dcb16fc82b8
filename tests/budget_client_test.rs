//! YNAB budget client tests against a mock server

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

use TravelBuddy::config::BudgetConfig;
use TravelBuddy::services::{BudgetProvider, YnabClient};
use TravelBuddy::utils::errors::TravelBuddyError;

const CATEGORY_PATH: &str = "/budgets/budget-1/categories/travel-1";

fn config(server: &MockServer) -> BudgetConfig {
    BudgetConfig {
        access_token: "ynab-token".to_string(),
        budget_id: "budget-1".to_string(),
        category_id: "travel-1".to_string(),
        base_url: server.uri(),
        timeout_seconds: 1,
    }
}

#[tokio::test]
async fn test_milliunits_are_converted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .and(header("authorization", "Bearer ynab-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "category": {
                    "id": "travel-1",
                    "name": "Travel",
                    "budgeted": 450750,
                    "activity": -120000,
                    "balance": 330750
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = YnabClient::new(config(&server)).unwrap();
    let budget = client.travel_budget().await.unwrap();

    assert_eq!(budget.budgeted, 450.75);
    assert_eq!(budget.activity, -120.0);
    assert_eq!(budget.balance, 330.75);
}

#[tokio::test]
async fn test_error_status_is_budget_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = YnabClient::new(config(&server)).unwrap();
    assert_matches!(client.travel_budget().await, Err(TravelBuddyError::BudgetUnavailable(_)));
}

#[tokio::test]
async fn test_malformed_body_is_budget_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(CATEGORY_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {}})))
        .mount(&server)
        .await;

    let client = YnabClient::new(config(&server)).unwrap();
    assert_matches!(client.travel_budget().await, Err(TravelBuddyError::BudgetUnavailable(_)));
}
