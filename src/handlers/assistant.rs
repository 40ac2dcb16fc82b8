//! Trip assistant
//!
//! The orchestration boundary. Each call to [`TripAssistant::handle`] runs one
//! action against one session while holding that session's lock, and always
//! produces a reply: errors are turned into a message and a status flag.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{Duration, NaiveDate, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::services::booking::{self, Selection};
use crate::services::pagination::{self, Navigation};
use crate::services::{budget, dates, reset, SearchOutcome, ServiceFactory};
use crate::state::{slots, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};
use crate::utils::logging::log_session_action;
use super::actions::Action;
use super::render::{self, Button, Reply};

pub struct TripAssistant {
    services: ServiceFactory,
    session_ttl: Duration,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TripAssistant {
    pub fn new(services: ServiceFactory, session_ttl: Duration) -> Self {
        Self {
            services,
            session_ttl,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn services(&self) -> &ServiceFactory {
        &self.services
    }

    async fn session_lock(&self, session_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(session_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run one action for a session.
    ///
    /// On failure the session is saved exactly as it was before the action,
    /// apart from the `status` slot.
    pub async fn handle(&self, session_id: &str, action: Action) -> Reply {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = match self.services.sessions.load(session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!(session_id = %session_id, "Starting new trip session");
                TripSession::with_ttl(session_id, self.session_ttl)
            }
            Err(e) => {
                error!(session_id = %session_id, error = %e, "Failed to load session");
                return Reply::from_error(&e);
            }
        };

        let snapshot = session.clone();
        let reply = match self.dispatch(&mut session, &action).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(session_id = %session_id, action = action.name(), error = %e,
                      severity = %e.severity(), recoverable = e.is_recoverable(), "Action failed");
                session = snapshot;
                Reply::from_error(&e)
            }
        };

        if let Err(e) = session.set_status(reply.status) {
            warn!(session_id = %session_id, error = %e, "Failed to record status");
        }
        session.touch(self.session_ttl);

        if let Err(e) = self.services.sessions.save(&session).await {
            error!(session_id = %session_id, error = %e, "Failed to save session");
            return Reply::from_error(&e);
        }

        log_session_action(session_id, action.name(), Some(reply.status.as_str()));
        reply
    }

    async fn dispatch(&self, session: &mut TripSession, action: &Action) -> Result<Reply> {
        match action {
            Action::Search => self.handle_search(session).await,
            Action::ShowResults => Ok(render::render_page(&pagination::show_results(session)?)),
            Action::ShowMore => match pagination::show_more(session)? {
                Navigation::Moved(view) => Ok(render::render_page(&view)),
                Navigation::NoMore { .. } => Ok(Reply::success("No more flight options available.")
                    .with_buttons(vec![Button::new("Previous Options", Action::ShowPrevious)])),
                Navigation::NoPrevious => Ok(Reply::success("You're already at the first page of results.")),
            },
            Action::ShowPrevious => match pagination::show_previous(session)? {
                Navigation::Moved(view) => Ok(render::render_page(&view)),
                _ => Ok(Reply::success("You're already at the first page of results.")),
            },
            Action::SelectDestination(raw) => {
                let selection = booking::select_destination(session, raw)?;
                Ok(selection_reply(&selection))
            }
            Action::SelectFlight(raw) => {
                let selection = booking::select_flight(session, raw)?;
                Ok(selection_reply(&selection))
            }
            Action::TransitionToBooking => {
                let suggestion = booking::transition_to_booking(session)?;
                let summary = booking::confirm_details(session);
                Ok(Reply::success(format!(
                    "Let's book your trip to {}.\n{}",
                    suggestion.destination,
                    render::render_summary(&summary)
                ))
                .with_buttons(vec![Button::new("Search Flights", Action::Search)]))
            }
            Action::ConfirmDetails => {
                let summary = booking::confirm_details(session);
                Ok(Reply::success(render::render_summary(&summary)))
            }
            Action::ConfirmBooking => {
                let record = self.services.booking_service.confirm_booking(session).await?;
                Ok(Reply::success(format!(
                    "Your flight is booked!\n{}",
                    render::render_booking(&record)
                )))
            }
            Action::Reset => {
                reset::reset(session)?;
                Ok(Reply::success("Your trip details have been cleared."))
            }
            Action::SetSlot(key, value) => {
                if key == slots::STATUS {
                    return Err(TravelBuddyError::InvalidInput("the status slot is managed automatically".to_string()));
                }
                session.set_data(key, value)?;
                Ok(Reply::success(format!("Noted {}.", key)))
            }
            Action::ResolveTimeframe => {
                let window = dates::apply_timeframe(session, today())?;
                let mut text = format!(
                    "You'd travel from {} to {}.",
                    window.departure.format("%b %d, %Y"),
                    window.return_date.format("%b %d, %Y")
                );
                if window.defaulted {
                    text.push_str(" I picked dates for you since I couldn't work out when you'd like to go.");
                }
                Ok(Reply::success(text))
            }
            Action::FetchBudget => {
                let budget = budget::apply_budget(session, self.services.budget.as_deref()).await?;
                Ok(Reply::success(format!(
                    "Your travel budget is {:.2} (spent {:.2}, {:.2} left).",
                    budget.budgeted,
                    -budget.activity,
                    budget.balance
                )))
            }
            Action::UsePreferredDeparture => {
                let city = self.services.profile_service.use_preferred_departure(session).await?;
                Ok(Reply::success(format!("Departing from {}.", city)))
            }
            Action::ListBookings => {
                let (user, bookings) = self.services.profile_service.list_bookings(session).await?;
                Ok(Reply::success(render::render_bookings(&user, &bookings)))
            }
        }
    }

    async fn handle_search(&self, session: &mut TripSession) -> Result<Reply> {
        match self.services.search_service.search(session).await? {
            SearchOutcome::Found { kind, count } => {
                info!(session_id = %session.session_id, kind = %kind, results = count, "Search succeeded");
                // The list is already in the session; render from it
                Ok(render::render_page(&pagination::show_results(session)?))
            }
            SearchOutcome::NotFound { .. } => Ok(Reply::from_error(&TravelBuddyError::NotFound)),
        }
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn selection_reply(selection: &Selection) -> Reply {
    match selection {
        Selection::Destination { suggestion, .. } => Reply::success(format!(
            "Great choice! {} → {} from {} {}.",
            suggestion.origin,
            suggestion.destination,
            suggestion.price.currency_or(crate::models::DEFAULT_CURRENCY),
            suggestion.price.total
        ))
        .with_buttons(vec![Button::new("Book this trip", Action::TransitionToBooking)]),
        Selection::Flight { option, offer } => Reply::success(format!(
            "You picked option {}.\n{}",
            option,
            render::render_offer(*option, offer)
        ))
        .with_buttons(vec![
            Button::new("Confirm Booking", Action::ConfirmBooking),
            Button::new("Review Details", Action::ConfirmDetails),
        ]),
    }
}
