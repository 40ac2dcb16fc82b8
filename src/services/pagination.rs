//! Result pagination
//!
//! Stored result lists are shown three at a time. The current page lives in
//! the session; navigation flags are always derived from it, never stored.

use crate::models::{DestinationSuggestion, PricedOffer};
use crate::state::{slots, ResultsKind, TripSession};
use crate::utils::errors::{TravelBuddyError, Result};

pub const PAGE_SIZE: usize = 3;

/// Index range `[start, end)` of `page` in a list of `len` items
pub fn page_bounds(page: usize, len: usize) -> (usize, usize) {
    let start = page.saturating_mul(PAGE_SIZE).min(len);
    let end = start.saturating_add(PAGE_SIZE).min(len);
    (start, end)
}

pub fn has_more(page: usize, len: usize) -> bool {
    page.saturating_add(1).saturating_mul(PAGE_SIZE) < len
}

pub fn has_previous(page: usize) -> bool {
    page > 0
}

/// Slice of `list` shown on `page`; fails with `NoResults` for an empty or absent list
pub fn show_page<T>(list: Option<&[T]>, page: usize) -> Result<&[T]> {
    let list = list.filter(|l| !l.is_empty()).ok_or(TravelBuddyError::NoResults)?;
    let (start, end) = page_bounds(page, list.len());
    Ok(&list[start..end])
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageItems {
    Suggestions(Vec<DestinationSuggestion>),
    Offers(Vec<PricedOffer>),
}

/// One rendered page of the active result list
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub page: usize,
    /// Position of the first item in the full list
    pub start: usize,
    pub total: usize,
    pub has_more: bool,
    pub has_previous: bool,
    pub items: PageItems,
}

impl PageView {
    pub fn kind(&self) -> ResultsKind {
        match self.items {
            PageItems::Suggestions(_) => ResultsKind::Suggestions,
            PageItems::Offers(_) => ResultsKind::Offers,
        }
    }

    pub fn len(&self) -> usize {
        match &self.items {
            PageItems::Suggestions(items) => items.len(),
            PageItems::Offers(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Navigation {
    Moved(PageView),
    /// Already on the last page; the current page is unchanged
    NoMore { page: usize },
    /// Already on the first page
    NoPrevious,
}

enum ActiveList {
    Suggestions(Vec<DestinationSuggestion>),
    Offers(Vec<PricedOffer>),
}

impl ActiveList {
    fn len(&self) -> usize {
        match self {
            ActiveList::Suggestions(list) => list.len(),
            ActiveList::Offers(list) => list.len(),
        }
    }

    fn view(&self, page: usize) -> Result<PageView> {
        let total = self.len();
        let items = match self {
            ActiveList::Suggestions(list) => PageItems::Suggestions(show_page(Some(list.as_slice()), page)?.to_vec()),
            ActiveList::Offers(list) => PageItems::Offers(show_page(Some(list.as_slice()), page)?.to_vec()),
        };
        Ok(PageView {
            page,
            start: page_bounds(page, total).0,
            total,
            has_more: has_more(page, total),
            has_previous: has_previous(page),
            items,
        })
    }
}

fn active_list(session: &TripSession) -> Result<ActiveList> {
    let list = match session.active_results() {
        Some(ResultsKind::Suggestions) => session.suggestions()?.map(ActiveList::Suggestions),
        Some(ResultsKind::Offers) => session.offers()?.map(ActiveList::Offers),
        None => None,
    };
    list.filter(|l| l.len() > 0).ok_or(TravelBuddyError::NoResults)
}

/// Render the current page of the active list
pub fn show_results(session: &TripSession) -> Result<PageView> {
    let list = active_list(session)?;
    let last_page = (list.len() - 1) / PAGE_SIZE;
    list.view(session.current_page().min(last_page))
}

/// Advance one page; a no-op on the last page
pub fn show_more(session: &mut TripSession) -> Result<Navigation> {
    let list = active_list(session)?;
    let current = session.current_page();
    if !has_more(current, list.len()) {
        return Ok(Navigation::NoMore { page: current });
    }
    let next = current + 1;

    let view = list.view(next)?;
    session.set_data(slots::CURRENT_PAGE, next)?;
    Ok(Navigation::Moved(view))
}

/// Go back one page; a no-op on the first page
pub fn show_previous(session: &mut TripSession) -> Result<Navigation> {
    let list = active_list(session)?;
    let current = session.current_page();
    if current == 0 {
        return Ok(Navigation::NoPrevious);
    }

    let last_page = (list.len() - 1) / PAGE_SIZE;
    let previous = (current - 1).min(last_page);
    let view = list.view(previous)?;
    session.set_data(slots::CURRENT_PAGE, previous)?;
    Ok(Navigation::Moved(view))
}
