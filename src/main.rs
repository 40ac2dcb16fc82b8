//! TravelBuddy console
//!
//! Main application entry point. Reads one command per line from stdin and
//! prints the assistant's reply.

use std::sync::Arc;
use anyhow::Context;
use chrono::{Duration, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use TravelBuddy::{
    config::Settings,
    database::{JsonRecordStore, RecordStore},
    handlers::{Action, Reply, TripAssistant},
    services::{AmadeusClient, BudgetProvider, FlightProvider, ServiceFactory, YnabClient},
    state::{MemorySessionStore, RedisSessionStore, SessionStore},
    utils::{helpers, logging},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", TravelBuddy::info());

    // Initialize session storage
    let sessions: Arc<dyn SessionStore> = if settings.features.redis_sessions {
        info!("Connecting to Redis...");
        Arc::new(RedisSessionStore::new(settings.redis.clone()).await?)
    } else {
        info!("Keeping sessions in memory");
        Arc::new(MemorySessionStore::new())
    };

    // Initialize record store
    info!(path = %settings.records.path, "Opening traveller records");
    let records: Arc<dyn RecordStore> = Arc::new(JsonRecordStore::new(&settings.records.path));

    // Initialize providers
    let provider: Arc<dyn FlightProvider> = Arc::new(AmadeusClient::new(settings.amadeus.clone())?);
    let budget: Option<Arc<dyn BudgetProvider>> = match (&settings.budget, settings.features.budget_lookup) {
        (Some(config), true) => Some(Arc::new(YnabClient::new(config.clone())?)),
        _ => None,
    };

    let services = ServiceFactory::new(provider, records, sessions, budget);
    let health = services.health_check().await;
    for issue in health.get_issues() {
        warn!(issue = %issue, "Service health issue");
    }

    let assistant = TripAssistant::new(services, Duration::hours(settings.session.ttl_hours));
    let session_id = std::env::args().nth(1).unwrap_or_else(helpers::generate_uuid);
    info!(session_id = %session_id, "Session ready");

    println!("{}", TravelBuddy::info());
    println!("Session {} started {}", session_id, helpers::format_timestamp(Utc::now()));
    println!("Type a command (search, more, previous, destination <n>, book, flight <n>, confirm, reset, ...) or 'quit'.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        match Action::parse(line) {
            Ok(action) => print_reply(&assistant.handle(&session_id, action).await),
            Err(e) => println!("{}", e.user_message()),
        }
    }

    info!("Console closed");
    Ok(())
}

fn print_reply(reply: &Reply) {
    println!("{}", reply.text);
    for button in &reply.buttons {
        println!("  [{}] -> {}", button.title, button.payload);
    }
    println!("({})", reply.status);
}
