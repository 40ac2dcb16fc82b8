//! End-to-end conversation tests through the trip assistant

mod helpers;

use std::sync::Arc;
use async_trait::async_trait;
use serde_json::json;

use helpers::*;
use TravelBuddy::database::RecordStore;
use TravelBuddy::handlers::Action;
use TravelBuddy::services::{BudgetProvider, TravelBudget};
use TravelBuddy::state::{slots, SessionStore, TripStage};
use TravelBuddy::utils::errors::{OperationStatus, Result};

#[tokio::test]
async fn test_discover_select_and_book() {
    let provider = StubFlightProvider::new()
        .then_destinations(create_suggestions(4))
        .then_offers(vec![create_one_way_offer("95.00"), create_round_trip_offer("240.00")]);
    let ctx = TestContext::new(provider, vec![create_user(1, &[3])]);

    assert_eq!(ctx.send("set user_id 1").await.status, OperationStatus::Success);
    assert_eq!(ctx.send("set departure_city Madrid").await.status, OperationStatus::Success);

    let reply = ctx.send("search").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("✈️ Flight 1"));
    assert!(reply.buttons.iter().any(|b| b.payload == "more"));

    let reply = ctx.send("more").await;
    assert!(reply.text.contains("✈️ Flight 4"));
    assert_eq!(ctx.session().await.current_page(), 1);

    let reply = ctx.send("destination:3").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert_eq!(ctx.session().await.stage(), TripStage::DestinationSelected);

    let reply = ctx.send("book").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("D03"));

    let reply = ctx.send("search").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("Option 2"));
    let session = ctx.session().await;
    assert_eq!(session.stage(), TripStage::BookingConfirmPending);
    assert_eq!(ctx.provider.last_params().unwrap().destination, Some("D03".to_string()));

    assert_eq!(ctx.send("flight 2").await.status, OperationStatus::Success);
    let reply = ctx.send("confirm").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("Booking #4"));

    let session = ctx.session().await;
    assert_eq!(session.stage(), TripStage::Booked);
    assert_eq!(session.status(), Some(OperationStatus::Success));
    assert_eq!(ctx.records.get_user(1).await.unwrap().unwrap().flights.len(), 2);

    // The offer list is gone, so a second confirmation has nothing to book
    let reply = ctx.send("confirm").await;
    assert_eq!(reply.status, OperationStatus::Failure);
}

#[tokio::test]
async fn test_new_search_invalidates_picked_flight() {
    let provider = StubFlightProvider::new()
        .then_offers(vec![create_one_way_offer("95.00")])
        .then_destinations(create_suggestions(2));
    let ctx = TestContext::new(provider, vec![create_user(1, &[3])]);

    ctx.send("set user_id 1").await;
    ctx.send("set departure_city Madrid").await;
    ctx.send("set destination Paris").await;
    ctx.send("set departureDate 2024-07-01").await;
    assert!(ctx.send("search").await.text.contains("Option 1"));
    assert_eq!(ctx.send("flight 1").await.status, OperationStatus::Success);

    ctx.send("set destination null").await;
    let reply = ctx.send("search").await;
    assert!(reply.text.contains("✈️ Flight 1"));
    assert!(!ctx.session().await.has_slot(slots::SELECTED_FLIGHT_INDEX));

    let reply = ctx.send("confirm").await;
    assert_eq!(reply.status, OperationStatus::Failure);
    assert_eq!(ctx.records.get_user(1).await.unwrap().unwrap().flights.len(), 1);
}

#[tokio::test]
async fn test_huge_page_number_is_handled() {
    let ctx = TestContext::new(StubFlightProvider::new().then_destinations(create_suggestions(4)), vec![]);
    ctx.send("set departure_city Madrid").await;
    ctx.send("search").await;
    ctx.send("set current_page 9223372036854775807").await;

    let reply = ctx.send("more").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("No more"));

    let reply = ctx.send("results").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("✈️ Flight 4"));
}

#[tokio::test]
async fn test_errors_become_status_flags() {
    let ctx = TestContext::new(StubFlightProvider::new().then_destinations(create_suggestions(2)), vec![]);

    // Paging before any search
    let reply = ctx.send("more").await;
    assert_eq!(reply.status, OperationStatus::Failure);
    assert_eq!(ctx.session().await.status(), Some(OperationStatus::Failure));

    let reply = ctx.send("search").await;
    assert_eq!(reply.status, OperationStatus::Failure);
    assert!(reply.text.contains("flying from"));

    ctx.send("set departure_city Madrid").await;
    ctx.send("search").await;
    let before = ctx.session().await;

    let reply = ctx.send("destination 9").await;
    assert_eq!(reply.status, OperationStatus::Failure);

    let after = ctx.session().await;
    let mut expected = before.slots.clone();
    expected.insert(slots::STATUS.to_string(), json!("failure"));
    assert_eq!(after.slots, expected);
}

#[tokio::test]
async fn test_no_flights_found_status() {
    let ctx = TestContext::new(StubFlightProvider::new().then_destinations(vec![]), vec![]);
    ctx.send("set departure_city Madrid").await;

    let reply = ctx.send("search").await;

    assert_eq!(reply.status, OperationStatus::NoFlightsFound);
    let session = ctx.session().await;
    assert_eq!(session.slots.get(slots::FLIGHT_SUGGESTIONS), Some(&json!(null)));
    assert_eq!(session.get_string(slots::STATUS), Some("no_flights_found".to_string()));
}

#[tokio::test]
async fn test_provider_failure_is_error_status() {
    let ctx = TestContext::new(StubFlightProvider::new().then_unavailable("connection reset"), vec![]);
    ctx.send("set departure_city Madrid").await;

    let reply = ctx.send("search").await;
    assert_eq!(reply.status, OperationStatus::Error);
    assert!(reply.text.contains("trouble reaching"));
}

#[tokio::test]
async fn test_paging_at_the_edges() {
    let ctx = TestContext::new(StubFlightProvider::new().then_destinations(create_suggestions(2)), vec![]);
    ctx.send("set departure_city Madrid").await;
    ctx.send("search").await;

    let reply = ctx.send("previous").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert!(reply.text.contains("first page"));

    let reply = ctx.send("more").await;
    assert!(reply.text.contains("No more"));
    assert_eq!(ctx.session().await.current_page(), 0);
}

#[tokio::test]
async fn test_reset_keeps_user() {
    let ctx = TestContext::new(StubFlightProvider::new().then_destinations(create_suggestions(5)), vec![]);
    ctx.send("set user_id 4").await;
    ctx.send("set departure_city Madrid").await;
    ctx.send("search").await;

    assert_eq!(ctx.send("reset").await.status, OperationStatus::Success);

    let session = ctx.session().await;
    assert_eq!(session.user_id(), Some(4));
    assert!(!session.has_slot(slots::FLIGHT_SUGGESTIONS));
    assert!(!session.has_slot(slots::DEPARTURE_CITY));
    assert_eq!(session.get_string(slots::NUMBER_OF_PAX), Some("1".to_string()));
    assert_eq!(session.stage(), TripStage::Idle);
}

#[tokio::test]
async fn test_profile_actions() {
    let ctx = TestContext::new(StubFlightProvider::new(), vec![create_user(2, &[1])]);

    assert_eq!(ctx.send("home").await.status, OperationStatus::Failure);

    ctx.send("set user_id 2").await;
    let reply = ctx.send("home").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert_eq!(ctx.session().await.get_string(slots::DEPARTURE_CITY), Some("Madrid".to_string()));

    let reply = ctx.send("bookings").await;
    assert!(reply.text.contains("Booking #1"));
    assert!(reply.text.contains("Ana Silva"));
}

#[tokio::test]
async fn test_timeframe_action() {
    let ctx = TestContext::new(StubFlightProvider::new(), vec![]);
    ctx.send("set travel_timeframe 2030-03-10").await;

    let reply = ctx.send("dates").await;

    assert_eq!(reply.status, OperationStatus::Success);
    let session = ctx.session().await;
    assert_eq!(session.get_string(slots::DEPARTURE_DATE), Some("2030-03-10".to_string()));
    assert_eq!(session.get_string(slots::RETURN_DATE), Some("2030-03-17".to_string()));
}

struct FixedBudget;

#[async_trait]
impl BudgetProvider for FixedBudget {
    async fn travel_budget(&self) -> Result<TravelBudget> {
        Ok(TravelBudget { budgeted: 800.0, activity: -150.0, balance: 650.0 })
    }
}

#[tokio::test]
async fn test_budget_action() {
    let ctx = TestContext::new(StubFlightProvider::new(), vec![]);
    assert_eq!(ctx.send("budget").await.status, OperationStatus::Failure);

    let ctx = TestContext::with_budget(StubFlightProvider::new(), vec![], Some(Arc::new(FixedBudget)));
    let reply = ctx.send("budget").await;
    assert_eq!(reply.status, OperationStatus::Success);
    assert_eq!(ctx.session().await.get_value(slots::TRAVEL_BUDGET), Some(&json!(800.0)));
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let ctx = TestContext::new(StubFlightProvider::new(), vec![]);

    let (a, b) = tokio::join!(
        ctx.assistant.handle("a", Action::SetSlot("destination".to_string(), json!("Rome"))),
        ctx.assistant.handle("b", Action::SetSlot("destination".to_string(), json!("Oslo"))),
    );
    assert_eq!(a.status, OperationStatus::Success);
    assert_eq!(b.status, OperationStatus::Success);

    let a = ctx.sessions.load("a").await.unwrap().unwrap();
    let b = ctx.sessions.load("b").await.unwrap().unwrap();
    assert_eq!(a.get_string(slots::DESTINATION), Some("Rome".to_string()));
    assert_eq!(b.get_string(slots::DESTINATION), Some("Oslo".to_string()));
}
