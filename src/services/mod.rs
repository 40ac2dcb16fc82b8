//! Services module
//!
//! This module contains the trip-planning business logic services

pub mod amadeus;
pub mod booking;
pub mod budget;
pub mod dates;
pub mod pagination;
pub mod profile;
pub mod provider;
pub mod reset;
pub mod search;

// Re-export commonly used services
pub use amadeus::AmadeusClient;
pub use booking::{BookingService, BookingSummary, Selection};
pub use budget::{BudgetProvider, TravelBudget, YnabClient};
pub use pagination::{Navigation, PageItems, PageView, PAGE_SIZE};
pub use profile::ProfileService;
pub use provider::{FlightProvider, ProviderResults, SearchParams};
pub use search::{SearchOutcome, SearchService};

use std::sync::Arc;

use crate::database::RecordStore;
use crate::state::SessionStore;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub provider: Arc<dyn FlightProvider>,
    pub records: Arc<dyn RecordStore>,
    pub sessions: Arc<dyn SessionStore>,
    pub budget: Option<Arc<dyn BudgetProvider>>,
    pub search_service: SearchService,
    pub booking_service: BookingService,
    pub profile_service: ProfileService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory over the given backends
    pub fn new(
        provider: Arc<dyn FlightProvider>,
        records: Arc<dyn RecordStore>,
        sessions: Arc<dyn SessionStore>,
        budget: Option<Arc<dyn BudgetProvider>>,
    ) -> Self {
        let search_service = SearchService::new(provider.clone(), records.clone());
        let booking_service = BookingService::new(records.clone());
        let profile_service = ProfileService::new(records.clone());

        Self {
            provider,
            records,
            sessions,
            budget,
            search_service,
            booking_service,
            profile_service,
        }
    }

    /// Health check for all backends
    pub async fn health_check(&self) -> ServiceHealthStatus {
        let (sessions_healthy, provider_healthy) =
            futures::join!(self.sessions.health_check(), self.provider.health_check());

        ServiceHealthStatus {
            sessions_healthy: sessions_healthy.unwrap_or(false),
            provider_healthy,
            budget_enabled: self.budget.is_some(),
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub sessions_healthy: bool,
    pub provider_healthy: bool,
    pub budget_enabled: bool,
}

impl ServiceHealthStatus {
    /// Sessions are required; a flaky provider only degrades searches
    pub fn is_healthy(&self) -> bool {
        self.sessions_healthy
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.sessions_healthy {
            issues.push("Session store unreachable".to_string());
        }
        if !self.provider_healthy {
            issues.push("Flight provider unreachable".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryRecordStore;
    use crate::state::MemorySessionStore;
    use crate::utils::errors::{TravelBuddyError, Result};
    use async_trait::async_trait;

    struct OfflineProvider;

    #[async_trait]
    impl FlightProvider for OfflineProvider {
        async fn resolve_location(&self, location: &str) -> Result<String> {
            Err(TravelBuddyError::LocationNotFound { location: location.to_string() })
        }

        async fn search(&self, _params: &SearchParams) -> Result<ProviderResults> {
            Err(TravelBuddyError::ProviderUnavailable("offline".to_string()))
        }

        async fn health_check(&self) -> bool {
            false
        }
    }

    #[tokio::test]
    async fn test_health_reports_provider_issue() {
        let services = ServiceFactory::new(
            Arc::new(OfflineProvider),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemorySessionStore::new()),
            None,
        );

        let health = services.health_check().await;
        assert!(health.is_healthy());
        assert!(!health.budget_enabled);
        assert_eq!(health.get_issues(), vec!["Flight provider unreachable".to_string()]);
    }
}
