//! Travel budget lookup
//!
//! Reads the traveller's travel category from a YNAB-style budgeting API.
//! Amounts arrive in milliunits.

use std::time::Duration;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::BudgetConfig;
use crate::state::{slots, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::logging::log_provider_error;

const PROVIDER: &str = "ynab";

/// Travel category amounts in currency units
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelBudget {
    pub budgeted: f64,
    pub activity: f64,
    pub balance: f64,
}

#[async_trait]
pub trait BudgetProvider: Send + Sync {
    async fn travel_budget(&self) -> Result<TravelBudget>;
}

#[derive(Debug, Deserialize)]
struct CategoryResponse {
    data: CategoryData,
}

#[derive(Debug, Deserialize)]
struct CategoryData {
    category: Category,
}

#[derive(Debug, Deserialize)]
struct Category {
    budgeted: i64,
    activity: i64,
    balance: i64,
}

/// YNAB API client
#[derive(Debug, Clone)]
pub struct YnabClient {
    client: Client,
    config: BudgetConfig,
}

impl YnabClient {
    pub fn new(config: BudgetConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("TravelBuddy/1.0")
            .build()
            .map_err(TravelBuddyError::Http)?;

        Ok(Self { client, config })
    }

    fn unavailable(message: String) -> TravelBuddyError {
        log_provider_error(PROVIDER, &message, Some("travel category"));
        TravelBuddyError::BudgetUnavailable(message)
    }
}

#[async_trait]
impl BudgetProvider for YnabClient {
    async fn travel_budget(&self) -> Result<TravelBudget> {
        let url = format!(
            "{}/budgets/{}/categories/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.budget_id,
            self.config.category_id
        );
        debug!(url = %url, "Fetching travel budget");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|e| Self::unavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::unavailable(format!("HTTP {}", response.status())));
        }

        let body: CategoryResponse = response
            .json()
            .await
            .map_err(|e| Self::unavailable(format!("malformed response: {}", e)))?;

        let category = body.data.category;
        Ok(TravelBudget {
            budgeted: category.budgeted as f64 / 1000.0,
            activity: category.activity as f64 / 1000.0,
            balance: category.balance as f64 / 1000.0,
        })
    }
}

/// Store the budgeted travel amount in `travel_budget`.
///
/// Without a configured provider, or when the lookup fails, the session is unchanged.
pub async fn apply_budget(session: &mut TripSession, provider: Option<&dyn BudgetProvider>) -> Result<TravelBudget> {
    let provider = provider.ok_or_else(|| {
        TravelBuddyError::BudgetUnavailable("budget lookup is not configured".to_string())
    })?;

    let budget = provider.travel_budget().await.map_err(|e| match e {
        TravelBuddyError::BudgetUnavailable(_) => e,
        other => TravelBuddyError::BudgetUnavailable(other.to_string()),
    })?;

    if budget.budgeted <= 0.0 {
        warn!(session_id = %session.session_id, budgeted = budget.budgeted, "Travel category has nothing budgeted");
    }
    session.set_data(slots::TRAVEL_BUDGET, budget.budgeted)?;
    Ok(budget)
}
