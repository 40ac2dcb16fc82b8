//! Test context for unified test setup
//!
//! Wires a scripted provider, in-memory record and session stores, the
//! service factory and the assistant together.

use std::sync::Arc;
use chrono::Duration;

use TravelBuddy::database::MemoryRecordStore;
use TravelBuddy::handlers::{Action, Reply, TripAssistant};
use TravelBuddy::models::UserRecord;
use TravelBuddy::services::{BudgetProvider, ServiceFactory};
use TravelBuddy::state::{MemorySessionStore, SessionStore, TripSession};

use super::stub_provider::StubFlightProvider;

pub const SESSION_ID: &str = "test-session";

pub struct TestContext {
    pub provider: Arc<StubFlightProvider>,
    pub records: Arc<MemoryRecordStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub services: ServiceFactory,
    pub assistant: TripAssistant,
}

impl TestContext {
    pub fn new(provider: StubFlightProvider, users: Vec<UserRecord>) -> Self {
        Self::with_budget(provider, users, None)
    }

    pub fn with_budget(
        provider: StubFlightProvider,
        users: Vec<UserRecord>,
        budget: Option<Arc<dyn BudgetProvider>>,
    ) -> Self {
        // Initialize logging once
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let provider = Arc::new(provider);
        let records = Arc::new(MemoryRecordStore::with_users(users));
        let sessions = Arc::new(MemorySessionStore::new());
        let services = ServiceFactory::new(provider.clone(), records.clone(), sessions.clone(), budget);
        let assistant = TripAssistant::new(services.clone(), Duration::hours(1));

        Self {
            provider,
            records,
            sessions,
            services,
            assistant,
        }
    }

    /// Run one typed command against the default session
    pub async fn send(&self, line: &str) -> Reply {
        let action = Action::parse(line).expect("valid command");
        self.assistant.handle(SESSION_ID, action).await
    }

    pub async fn session(&self) -> TripSession {
        self.sessions
            .load(SESSION_ID)
            .await
            .expect("session store readable")
            .expect("session exists")
    }
}
