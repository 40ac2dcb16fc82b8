//! Travel timeframe resolution
//!
//! Turns free text such as "in july", "next month", "this summer" or
//! "06/15/2025" into a departure and return date.

use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::state::{slots, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};

/// Days between departure and return when only one date is known
const DEFAULT_TRIP_DAYS: i64 = 7;

/// Day of next month used when nothing in the text is recognised
const FALLBACK_DAY: u32 = 15;

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

/// (name, start month, start day, end month, end day)
const SEASONS: [(&str, u32, u32, u32, u32); 5] = [
    ("spring", 3, 21, 6, 20),
    ("summer", 6, 21, 9, 22),
    ("fall", 9, 23, 12, 20),
    ("autumn", 9, 23, 12, 20),
    ("winter", 12, 21, 3, 20),
];

static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})-(\d{1,2})-(\d{1,2})").unwrap());
static US_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelWindow {
    pub departure: NaiveDate,
    pub return_date: NaiveDate,
    /// Nothing in the text was recognised and the fallback window was used
    pub defaulted: bool,
}

/// Resolve a timeframe relative to `today`.
///
/// An explicit date wins over a season, a season over "next month", and
/// "next month" over a month name.
pub fn resolve_timeframe(text: &str, today: NaiveDate) -> Result<TravelWindow> {
    let timeframe = text.to_lowercase();

    if let Some(departure) = explicit_date(&timeframe)? {
        return Ok(TravelWindow {
            departure,
            return_date: departure + Duration::days(DEFAULT_TRIP_DAYS),
            defaulted: false,
        });
    }

    if let Some(window) = season_window(&timeframe, today) {
        return Ok(window);
    }

    if timeframe.contains("next month") {
        let (year, month) = next_month(today);
        return Ok(whole_month(year, month));
    }

    if let Some(month) = MONTHS.iter().position(|m| timeframe.contains(m)) {
        let month = month as u32 + 1;
        let year = if month < today.month() { today.year() + 1 } else { today.year() };
        return Ok(whole_month(year, month));
    }

    let (year, month) = next_month(today);
    let departure = ymd(year, month, FALLBACK_DAY);
    Ok(TravelWindow {
        departure,
        return_date: departure + Duration::days(DEFAULT_TRIP_DAYS),
        defaulted: true,
    })
}

fn explicit_date(timeframe: &str) -> Result<Option<NaiveDate>> {
    let parts = if let Some(caps) = ISO_DATE.captures(timeframe) {
        (caps[1].to_string(), caps[2].to_string(), caps[3].to_string())
    } else if let Some(caps) = US_DATE.captures(timeframe) {
        (caps[3].to_string(), caps[1].to_string(), caps[2].to_string())
    } else {
        return Ok(None);
    };

    let (year, month, day) = parts;
    let date = match (year.parse::<i32>(), month.parse::<u32>(), day.parse::<u32>()) {
        (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d),
        _ => None,
    };
    date.map(Some).ok_or_else(|| {
        TravelBuddyError::InvalidInput(format!("{}-{}-{} is not a calendar date", year, month, day))
    })
}

fn season_window(timeframe: &str, today: NaiveDate) -> Option<TravelWindow> {
    let (name, start_month, start_day, end_month, end_day) =
        *SEASONS.iter().find(|(name, ..)| timeframe.contains(name))?;

    if name == "winter" {
        // Winter runs into the following year
        return Some(TravelWindow {
            departure: ymd(today.year(), start_month, start_day),
            return_date: ymd(today.year() + 1, end_month, end_day),
            defaulted: false,
        });
    }

    let past_season = (today.month(), today.day()) > (end_month, end_day);
    let year = if past_season { today.year() + 1 } else { today.year() };
    Some(TravelWindow {
        departure: ymd(year, start_month, start_day),
        return_date: ymd(year, end_month, end_day),
        defaulted: false,
    })
}

fn next_month(today: NaiveDate) -> (i32, u32) {
    if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    }
}

fn whole_month(year: i32, month: u32) -> TravelWindow {
    let departure = ymd(year, month, 1);
    let (next_year, next) = next_month(departure);
    let return_date = ymd(next_year, next, 1) - Duration::days(1);
    TravelWindow {
        departure,
        return_date,
        defaulted: false,
    }
}

/// Build a date from parts known to be valid
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

/// Resolve the session's `travel_timeframe` into `departureDate` and `returnDate`
pub fn apply_timeframe(session: &mut TripSession, today: NaiveDate) -> Result<TravelWindow> {
    let text = session
        .get_string(slots::TRAVEL_TIMEFRAME)
        .ok_or_else(|| TravelBuddyError::MissingRequiredSlot {
            slot: slots::TRAVEL_TIMEFRAME.to_string(),
        })?;

    let window = resolve_timeframe(&text, today)?;
    session.set_data(slots::DEPARTURE_DATE, window.departure.format("%Y-%m-%d").to_string())?;
    session.set_data(slots::RETURN_DATE, window.return_date.format("%Y-%m-%d").to_string())?;

    debug!(session_id = %session.session_id, timeframe = %text, departure = %window.departure,
           return_date = %window.return_date, defaulted = window.defaulted, "Resolved travel dates");
    Ok(window)
}
