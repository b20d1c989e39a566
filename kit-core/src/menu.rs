//! Button-driven menu state machine.
//!
//! The machine is pure: [`Menu::press`] consumes one debounced button event,
//! mutates the screen state, and at most emits a [`UiRequest`] for the
//! application loop to service against the store and cache. Results come
//! back through the `enter_*` methods. No screen ever touches hardware or
//! the database, which is what makes the whole navigation tree testable on
//! the host.
//!
//! Screen map:
//!
//! ```text
//! Main ──confirm("Today")────► Today ──confirm──► LogEvent(type) ─┐
//!      ──confirm("Log Event")► LogEvent(contact → type → rating) ─┤
//!      ──confirm("Contacts")─► Contacts                           │
//!                                  commit ──► Confirmed ──dwell──► Main
//! ```
//!
//! Every list screen wraps its cursor modulo the list length in both
//! directions, Main included (the source device clamped Main when moving up
//! from the top; one consistent wraparound policy replaces that quirk).

use tracing::debug;

use crate::types::{Contact, EventDraft, EventType, Rating};

/// The four physical buttons, already debounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Scroll up.
    Up,
    /// Scroll down.
    Down,
    /// Leave the current screen / abort the current flow.
    Back,
    /// Select the highlighted entry ("OK").
    Confirm,
}

/// Work the application loop must perform on the menu's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiRequest {
    /// Fetch the today-set and call [`Menu::enter_today`].
    LoadToday,
    /// Fetch all contacts and call [`Menu::enter_contacts`].
    LoadContacts,
    /// Fetch all contacts and call [`Menu::enter_log_event`].
    LoadLogEvent,
    /// Write the finished draft, then call [`Menu::event_committed`].
    Commit(EventDraft),
}

/// Main-menu entries, in display order.
pub const MAIN_OPTIONS: [&str; 3] = ["Today", "Log Event", "Contacts"];

const MAIN_TODAY: usize = 0;
const MAIN_LOG_EVENT: usize = 1;
const MAIN_CONTACTS: usize = 2;

/// Which step of the Log Event flow is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStep {
    /// Choosing who the interaction was with.
    SelectContact,
    /// Choosing how it happened.
    SelectType,
    /// Choosing how it went.
    SelectRating,
}

/// State of the three-step Log Event flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEventFlow {
    /// Selectable contacts (alphabetical), empty when entered pre-seeded.
    pub contacts: Vec<Contact>,
    /// Current step.
    pub step: LogStep,
    /// Cursor into the current step's list.
    pub cursor: usize,
    /// Contact locked in by the first step (or by the Today screen).
    pub chosen_contact: Option<Contact>,
    /// Event type locked in by the second step.
    pub chosen_type: Option<EventType>,
    /// Entered from the Today screen with the contact already fixed; Back
    /// from the type step then aborts instead of re-opening selection.
    pub preseeded: bool,
}

impl LogEventFlow {
    fn list_len(&self) -> usize {
        match self.step {
            LogStep::SelectContact => self.contacts.len(),
            LogStep::SelectType => EventType::ALL.len(),
            LogStep::SelectRating => Rating::ALL.len(),
        }
    }
}

/// The active screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuScreen {
    /// Top-level menu over [`MAIN_OPTIONS`].
    Main {
        /// Highlighted entry.
        cursor: usize,
    },
    /// Today's suggested contacts.
    Today {
        /// The today-set, possibly empty.
        contacts: Vec<Contact>,
        /// Highlighted entry (0 when empty).
        cursor: usize,
    },
    /// Full contact list browser.
    Contacts {
        /// All contacts, alphabetical.
        contacts: Vec<Contact>,
        /// Highlighted entry (0 when empty).
        cursor: usize,
    },
    /// The Log Event flow.
    LogEvent(LogEventFlow),
    /// Post-commit confirmation splash.
    Confirmed {
        /// Name of the contact the event was logged for.
        name: String,
    },
}

/// Move a cursor one step up with wraparound; empty lists stay at 0.
#[must_use]
pub fn wrap_up(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (cursor + len - 1) % len
    }
}

/// Move a cursor one step down with wraparound; empty lists stay at 0.
#[must_use]
pub fn wrap_down(cursor: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (cursor + 1) % len
    }
}

/// The menu state machine.
#[derive(Debug, Clone)]
pub struct Menu {
    screen: MenuScreen,
    /// Main-menu cursor survives round trips through the sub-flows, matching
    /// the physical device's behavior of landing back on the entry you left.
    main_cursor: usize,
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

impl Menu {
    /// Start at the main menu with the first entry highlighted.
    #[must_use]
    pub fn new() -> Self {
        Self {
            screen: MenuScreen::Main { cursor: 0 },
            main_cursor: 0,
        }
    }

    /// The screen to render.
    #[must_use]
    pub fn screen(&self) -> &MenuScreen {
        &self.screen
    }

    fn to_main(&mut self) {
        self.screen = MenuScreen::Main {
            cursor: self.main_cursor,
        };
    }

    // ------------------------------------------------------------------
    // Data feed-in from the application loop
    // ------------------------------------------------------------------

    /// Show the Today screen over the fetched today-set.
    pub fn enter_today(&mut self, contacts: Vec<Contact>) {
        self.screen = MenuScreen::Today { contacts, cursor: 0 };
    }

    /// Show the Contacts browser over the fetched contact list.
    pub fn enter_contacts(&mut self, contacts: Vec<Contact>) {
        self.screen = MenuScreen::Contacts { contacts, cursor: 0 };
    }

    /// Start the Log Event flow at contact selection.
    pub fn enter_log_event(&mut self, contacts: Vec<Contact>) {
        self.screen = MenuScreen::LogEvent(LogEventFlow {
            contacts,
            step: LogStep::SelectContact,
            cursor: 0,
            chosen_contact: None,
            chosen_type: None,
            preseeded: false,
        });
    }

    /// Show the post-commit confirmation splash.
    pub fn event_committed(&mut self, name: String) {
        self.screen = MenuScreen::Confirmed { name };
    }

    /// Dismiss the confirmation splash after its dwell, back to Main.
    pub fn dismiss_confirmation(&mut self) {
        self.to_main();
    }

    // ------------------------------------------------------------------
    // Button handling
    // ------------------------------------------------------------------

    /// Feed one debounced button press through the machine.
    ///
    /// Returns the request the application loop must service, if any.
    pub fn press(&mut self, button: Button) -> Option<UiRequest> {
        debug!(?button, "menu press");
        let screen = std::mem::replace(&mut self.screen, MenuScreen::Main { cursor: 0 });
        let (next, request) = self.transition(screen, button);
        self.screen = next;
        request
    }

    fn transition(&mut self, screen: MenuScreen, button: Button) -> (MenuScreen, Option<UiRequest>) {
        match screen {
            MenuScreen::Main { mut cursor } => {
                let request = match button {
                    Button::Up => {
                        cursor = wrap_up(cursor, MAIN_OPTIONS.len());
                        None
                    }
                    Button::Down => {
                        cursor = wrap_down(cursor, MAIN_OPTIONS.len());
                        None
                    }
                    // Nothing above the main menu.
                    Button::Back => None,
                    Button::Confirm => Some(match cursor {
                        MAIN_TODAY => UiRequest::LoadToday,
                        MAIN_LOG_EVENT => UiRequest::LoadLogEvent,
                        MAIN_CONTACTS => UiRequest::LoadContacts,
                        _ => unreachable!("main cursor wraps within MAIN_OPTIONS"),
                    }),
                };
                self.main_cursor = cursor;
                (MenuScreen::Main { cursor }, request)
            }

            MenuScreen::Today { contacts, cursor } => match button {
                Button::Up => {
                    let cursor = wrap_up(cursor, contacts.len());
                    (MenuScreen::Today { contacts, cursor }, None)
                }
                Button::Down => {
                    let cursor = wrap_down(cursor, contacts.len());
                    (MenuScreen::Today { contacts, cursor }, None)
                }
                Button::Back => (
                    MenuScreen::Main {
                        cursor: self.main_cursor,
                    },
                    None,
                ),
                Button::Confirm => {
                    // Jump straight into logging an event for the suggested
                    // contact, skipping contact selection.
                    if let Some(contact) = contacts.get(cursor).cloned() {
                        (
                            MenuScreen::LogEvent(LogEventFlow {
                                contacts: Vec::new(),
                                step: LogStep::SelectType,
                                cursor: 0,
                                chosen_contact: Some(contact),
                                chosen_type: None,
                                preseeded: true,
                            }),
                            None,
                        )
                    } else {
                        (MenuScreen::Today { contacts, cursor }, None)
                    }
                }
            },

            MenuScreen::Contacts { contacts, cursor } => match button {
                Button::Up => {
                    let cursor = wrap_up(cursor, contacts.len());
                    (MenuScreen::Contacts { contacts, cursor }, None)
                }
                Button::Down => {
                    let cursor = wrap_down(cursor, contacts.len());
                    (MenuScreen::Contacts { contacts, cursor }, None)
                }
                Button::Back => (
                    MenuScreen::Main {
                        cursor: self.main_cursor,
                    },
                    None,
                ),
                // Browsing only; the entry has no action.
                Button::Confirm => (MenuScreen::Contacts { contacts, cursor }, None),
            },

            MenuScreen::LogEvent(mut flow) => match Self::press_log_event(&mut flow, button) {
                LogOutcome::Stay => (MenuScreen::LogEvent(flow), None),
                LogOutcome::Abort => (
                    MenuScreen::Main {
                        cursor: self.main_cursor,
                    },
                    None,
                ),
                LogOutcome::Commit(draft) => {
                    (MenuScreen::LogEvent(flow), Some(UiRequest::Commit(draft)))
                }
            },

            // The splash screen ignores input; the app loop dismisses it
            // after the dwell.
            MenuScreen::Confirmed { name } => (MenuScreen::Confirmed { name }, None),
        }
    }

    fn press_log_event(flow: &mut LogEventFlow, button: Button) -> LogOutcome {
        match button {
            Button::Up => {
                flow.cursor = wrap_up(flow.cursor, flow.list_len());
                LogOutcome::Stay
            }
            Button::Down => {
                flow.cursor = wrap_down(flow.cursor, flow.list_len());
                LogOutcome::Stay
            }
            Button::Back => match flow.step {
                // Aborting from the first reachable step cancels the event.
                LogStep::SelectContact => LogOutcome::Abort,
                LogStep::SelectType => {
                    if flow.preseeded {
                        LogOutcome::Abort
                    } else {
                        flow.step = LogStep::SelectContact;
                        flow.cursor = 0;
                        flow.chosen_contact = None;
                        LogOutcome::Stay
                    }
                }
                LogStep::SelectRating => {
                    flow.step = LogStep::SelectType;
                    flow.cursor = 0;
                    flow.chosen_type = None;
                    LogOutcome::Stay
                }
            },
            Button::Confirm => match flow.step {
                LogStep::SelectContact => {
                    if let Some(contact) = flow.contacts.get(flow.cursor).cloned() {
                        flow.chosen_contact = Some(contact);
                        flow.step = LogStep::SelectType;
                        flow.cursor = 0;
                    }
                    LogOutcome::Stay
                }
                LogStep::SelectType => {
                    flow.chosen_type = Some(EventType::ALL[flow.cursor]);
                    flow.step = LogStep::SelectRating;
                    flow.cursor = 0;
                    LogOutcome::Stay
                }
                LogStep::SelectRating => {
                    let (Some(contact), Some(event_type)) =
                        (flow.chosen_contact.as_ref(), flow.chosen_type)
                    else {
                        // Unreachable by construction; treat as abort rather
                        // than logging a half-built event.
                        return LogOutcome::Abort;
                    };
                    LogOutcome::Commit(EventDraft {
                        contact_id: contact.id,
                        contact_name: contact.name.clone(),
                        event_type,
                        rating: Rating::ALL[flow.cursor],
                    })
                }
            },
        }
    }
}

enum LogOutcome {
    Stay,
    Abort,
    Commit(EventDraft),
}
