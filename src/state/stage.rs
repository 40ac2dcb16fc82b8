//! Trip planning stages
//!
//! A session moves from idle through browsing and selection to a confirmed
//! booking. Reset returns any stage to `Idle`.

use serde::{Deserialize, Serialize};
use crate::state::slots::ResultsKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStage {
    #[default]
    Idle,
    ResultsShown,
    DestinationSelected,
    BookingConfirmPending,
    Booked,
}

impl TripStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStage::Idle => "idle",
            TripStage::ResultsShown => "results_shown",
            TripStage::DestinationSelected => "destination_selected",
            TripStage::BookingConfirmPending => "booking_confirm_pending",
            TripStage::Booked => "booked",
        }
    }

    /// Stage after a search stored a fresh result list.
    ///
    /// An offer search run while a booking is pending keeps the booking
    /// pending so the traveller can pick one of the new offers.
    pub fn after_search(self, kind: ResultsKind) -> TripStage {
        match (self, kind) {
            (TripStage::BookingConfirmPending, ResultsKind::Offers) => TripStage::BookingConfirmPending,
            _ => TripStage::ResultsShown,
        }
    }

    /// Stages reachable from this one, reset excluded
    pub fn next_stages(&self) -> &'static [TripStage] {
        match self {
            TripStage::Idle => &[TripStage::ResultsShown],
            TripStage::ResultsShown => &[
                TripStage::ResultsShown,
                TripStage::DestinationSelected,
                TripStage::BookingConfirmPending,
            ],
            TripStage::DestinationSelected => &[
                TripStage::ResultsShown,
                TripStage::DestinationSelected,
                TripStage::BookingConfirmPending,
            ],
            TripStage::BookingConfirmPending => &[
                TripStage::BookingConfirmPending,
                TripStage::ResultsShown,
                TripStage::Booked,
            ],
            TripStage::Booked => &[TripStage::ResultsShown, TripStage::DestinationSelected],
        }
    }

    pub fn can_transition_to(&self, next: TripStage) -> bool {
        next == TripStage::Idle || self.next_stages().contains(&next)
    }
}

impl std::fmt::Display for TripStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
