//! Pagination tests over stored result lists

mod helpers;

use proptest::prelude::*;

use helpers::*;
use TravelBuddy::models::DestinationSuggestion;
use TravelBuddy::services::pagination::{self, Navigation, PageItems, PageView, PAGE_SIZE};
use TravelBuddy::state::{slots, ResultsKind, TripSession};

fn session_with_suggestions(count: usize) -> TripSession {
    let mut session = TripSession::new(SESSION_ID);
    session.set_data(slots::FLIGHT_SUGGESTIONS, create_suggestions(count)).unwrap();
    session.set_data(slots::ACTIVE_RESULTS, ResultsKind::Suggestions).unwrap();
    session.set_data(slots::CURRENT_PAGE, 0).unwrap();
    session
}

fn suggestions_of(view: &PageView) -> Vec<DestinationSuggestion> {
    match &view.items {
        PageItems::Suggestions(items) => items.clone(),
        PageItems::Offers(_) => panic!("expected suggestions"),
    }
}

fn moved(navigation: Navigation) -> PageView {
    match navigation {
        Navigation::Moved(view) => view,
        other => panic!("expected a page move, got {:?}", other),
    }
}

#[test]
fn test_seven_results_scenario() {
    let mut session = session_with_suggestions(7);
    let all = create_suggestions(7);

    let first = pagination::show_results(&session).unwrap();
    assert_eq!(suggestions_of(&first), all[0..3].to_vec());
    assert!(first.has_more);
    assert!(!first.has_previous);

    let second = moved(pagination::show_more(&mut session).unwrap());
    assert_eq!(suggestions_of(&second), all[3..6].to_vec());
    assert_eq!(session.current_page(), 1);

    let third = moved(pagination::show_more(&mut session).unwrap());
    assert_eq!(suggestions_of(&third), all[6..7].to_vec());
    assert!(!third.has_more);
    assert!(third.has_previous);
    assert_eq!(session.current_page(), 2);

    let before = session.slots.clone();
    assert_eq!(pagination::show_more(&mut session).unwrap(), Navigation::NoMore { page: 2 });
    assert_eq!(session.current_page(), 2);
    assert_eq!(session.slots, before);
}

#[test]
fn test_show_previous_at_first_page_is_noop() {
    let mut session = session_with_suggestions(5);
    let before = session.clone();

    assert_eq!(pagination::show_previous(&mut session).unwrap(), Navigation::NoPrevious);
    assert_eq!(session, before);
}

#[test]
fn test_show_previous_walks_back() {
    let mut session = session_with_suggestions(8);
    session.set_data(slots::CURRENT_PAGE, 2).unwrap();

    let view = moved(pagination::show_previous(&mut session).unwrap());
    assert_eq!(view.page, 1);
    assert_eq!(view.start, 3);
    assert!(view.has_more);
    assert!(view.has_previous);
}

#[test]
fn test_offers_are_paged_when_active() {
    let mut session = session_with_suggestions(2);
    let offers: Vec<_> = (0..4).map(|i| create_one_way_offer(&format!("{}.00", 50 + i))).collect();
    session.set_data(slots::FLIGHT_OFFERS, &offers).unwrap();
    session.set_data(slots::ACTIVE_RESULTS, ResultsKind::Offers).unwrap();

    let view = moved(pagination::show_more(&mut session).unwrap());
    assert_eq!(view.kind(), ResultsKind::Offers);
    assert_eq!(view.len(), 1);
    assert_eq!(view.total, 4);
}

#[test]
fn test_out_of_range_page_does_not_overflow() {
    let mut session = session_with_suggestions(4);
    session.set_data(slots::CURRENT_PAGE, i64::MAX).unwrap();
    let page = session.current_page();

    assert_eq!(pagination::show_more(&mut session).unwrap(), Navigation::NoMore { page });
    assert_eq!(pagination::show_results(&session).unwrap().page, 1);

    let view = moved(pagination::show_previous(&mut session).unwrap());
    assert_eq!(view.page, 1);
    assert_eq!(session.current_page(), 1);
}

proptest! {
    #[test]
    fn prop_show_more_reconstructs_list(count in 1usize..40) {
        let mut session = session_with_suggestions(count);
        let expected = create_suggestions(count);

        let mut collected = suggestions_of(&pagination::show_results(&session).unwrap());
        loop {
            match pagination::show_more(&mut session).unwrap() {
                Navigation::Moved(view) => collected.extend(suggestions_of(&view)),
                Navigation::NoMore { page } => {
                    prop_assert_eq!(page, (count - 1) / PAGE_SIZE);
                    break;
                }
                Navigation::NoPrevious => prop_assert!(false, "unexpected NoPrevious"),
            }
        }

        prop_assert_eq!(collected, expected);
    }

    #[test]
    fn prop_navigation_flags_match_page(count in 1usize..40, page in 0usize..15) {
        prop_assert_eq!(pagination::has_more(page, count), (page + 1) * PAGE_SIZE < count);
        prop_assert_eq!(pagination::has_previous(page), page > 0);
    }
}
