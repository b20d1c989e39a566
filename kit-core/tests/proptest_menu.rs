//! Property-based tests for the suggestion logic and menu navigation.
//!
//! `proptest` hammers the invariants that hold for every input:
//! the due predicate, the pick-size bound, circular cursor wraparound, and
//! the menu state machine's refusal to panic or lose its cursor under
//! arbitrary button mashing.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

use kit_core::menu::{wrap_down, wrap_up, Button, LogStep, Menu, MenuScreen, UiRequest};
use kit_core::suggest::{is_due, pick_today, PICK_COUNT};
use kit_core::types::{Contact, ContactId, EventType, Rating};

fn contact(id: i64, frequency_days: u32, last_contact: NaiveDate) -> Contact {
    Contact {
        id: ContactId(id),
        name: format!("contact-{id}"),
        frequency_days,
        last_contact,
    }
}

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 22).expect("date")
}

// ---------------------------------------------------------------------------
// Property: due iff elapsed whole days >= frequency
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn due_predicate_matches_day_arithmetic(
        frequency in 1u32..400,
        elapsed in 0u64..800,
    ) {
        let today = base_date();
        let last = today.checked_sub_days(Days::new(elapsed)).expect("date");
        let c = contact(1, frequency, last);
        prop_assert_eq!(is_due(&c, today), elapsed >= u64::from(frequency));
    }
}

// ---------------------------------------------------------------------------
// Property: |pick_today(due)| == min(3, |due|), members drawn without dups
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn pick_size_is_min_of_three_and_pool(pool_size in 0usize..20, seed in any::<u64>()) {
        let pool: Vec<Contact> = (0..pool_size)
            .map(|i| contact(i as i64, 7, base_date()))
            .collect();
        let mut rng = StdRng::seed_from_u64(seed);
        let picked = pick_today(pool.clone(), PICK_COUNT, &mut rng);

        prop_assert_eq!(picked.len(), pool_size.min(PICK_COUNT));

        let mut ids: Vec<i64> = picked.iter().map(|c| c.id.0).collect();
        ids.sort_unstable();
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(ids.len(), before, "no duplicate members");
        for c in &picked {
            prop_assert!(pool.contains(c), "every member comes from the pool");
        }
    }
}

// ---------------------------------------------------------------------------
// Property: cursor wraparound is circular for any list length
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn wraparound_is_inverse_and_circular(len in 1usize..50, cursor in 0usize..50) {
        let cursor = cursor % len;
        prop_assert!(wrap_up(cursor, len) < len);
        prop_assert!(wrap_down(cursor, len) < len);
        prop_assert_eq!(wrap_down(wrap_up(cursor, len), len), cursor);
        prop_assert_eq!(wrap_up(wrap_down(cursor, len), len), cursor);
        // The documented endpoints.
        prop_assert_eq!(wrap_down(len - 1, len), 0);
        prop_assert_eq!(wrap_up(0, len), len - 1);
    }
}

// ---------------------------------------------------------------------------
// Property: arbitrary button mashing keeps every cursor in bounds
// ---------------------------------------------------------------------------

fn arb_button() -> impl Strategy<Value = Button> {
    prop_oneof![
        Just(Button::Up),
        Just(Button::Down),
        Just(Button::Back),
        Just(Button::Confirm),
    ]
}

/// Service menu requests the way the app loop would, against canned lists.
fn service(menu: &mut Menu, request: UiRequest, contacts: &[Contact]) {
    match request {
        UiRequest::LoadToday => menu.enter_today(contacts.to_vec()),
        UiRequest::LoadContacts => menu.enter_contacts(contacts.to_vec()),
        UiRequest::LoadLogEvent => menu.enter_log_event(contacts.to_vec()),
        UiRequest::Commit(draft) => {
            menu.event_committed(draft.contact_name);
            menu.dismiss_confirmation();
        }
    }
}

fn cursor_in_bounds(screen: &MenuScreen) -> bool {
    match screen {
        MenuScreen::Main { cursor } => *cursor < 3,
        MenuScreen::Today { contacts, cursor } | MenuScreen::Contacts { contacts, cursor } => {
            contacts.is_empty() && *cursor == 0 || *cursor < contacts.len()
        }
        MenuScreen::LogEvent(flow) => match flow.step {
            LogStep::SelectContact => {
                flow.contacts.is_empty() && flow.cursor == 0 || flow.cursor < flow.contacts.len()
            }
            LogStep::SelectType => flow.cursor < EventType::ALL.len(),
            LogStep::SelectRating => flow.cursor < Rating::ALL.len(),
        },
        MenuScreen::Confirmed { .. } => true,
    }
}

proptest! {
    #[test]
    fn button_mashing_never_strands_the_cursor(
        presses in prop::collection::vec(arb_button(), 0..200),
        contact_count in 0usize..6,
    ) {
        let contacts: Vec<Contact> = (0..contact_count)
            .map(|i| contact(i as i64, 7, base_date()))
            .collect();

        let mut menu = Menu::new();
        for button in presses {
            if let Some(request) = menu.press(button) {
                service(&mut menu, request, &contacts);
            }
            prop_assert!(cursor_in_bounds(menu.screen()), "screen: {:?}", menu.screen());
        }
    }
}

// ---------------------------------------------------------------------------
// Property: a committed draft is always fully specified
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn commits_only_carry_listed_values(
        presses in prop::collection::vec(arb_button(), 0..300),
    ) {
        let contacts = vec![
            contact(1, 7, base_date()),
            contact(2, 14, base_date()),
        ];

        let mut menu = Menu::new();
        for button in presses {
            if let Some(request) = menu.press(button) {
                if let UiRequest::Commit(ref draft) = request {
                    prop_assert!(contacts.iter().any(|c| c.id == draft.contact_id));
                    prop_assert!(EventType::ALL.contains(&draft.event_type));
                    prop_assert!((1..=5).contains(&draft.rating.value()));
                }
                service(&mut menu, request, &contacts);
            }
        }
    }
}
