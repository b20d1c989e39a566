//! Core type definitions for the keepintouch appliance.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{KitError, Result};

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifier of a contact row in the store (SQLite rowid domain).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(pub i64);

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Contact
// ---------------------------------------------------------------------------

/// A person the owner wants to stay in touch with.
///
/// Contacts are created outside this system (the store is seeded externally)
/// and are never deleted by it; the only mutation the appliance performs is
/// bumping `last_contact` when an event is logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store identity.
    pub id: ContactId,
    /// Display name shown on the OLED.
    pub name: String,
    /// Desired contact cadence in days. Invariant: `> 0`.
    pub frequency_days: u32,
    /// Date of the most recent logged interaction. Invariant: `<= today`.
    pub last_contact: NaiveDate,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// How an interaction happened. The menu only ever offers these three, so
/// user input needs no further validation; [`EventType::parse`] guards the
/// store boundary against rows written by anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// Wrote an email.
    Email,
    /// Talked on the phone.
    PhoneCall,
    /// Met in person.
    InPerson,
}

impl EventType {
    /// Every event type, in menu order.
    pub const ALL: [Self; 3] = [Self::Email, Self::PhoneCall, Self::InPerson];

    /// Stable string stored in the events table (also the on-screen label).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::PhoneCall => "Phone Call",
            Self::InPerson => "In-person",
        }
    }

    /// Parse a stored event-type string.
    ///
    /// # Errors
    /// Returns [`KitError::InvalidValue`] for anything but the three known
    /// labels.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "Email" => Ok(Self::Email),
            "Phone Call" => Ok(Self::PhoneCall),
            "In-person" => Ok(Self::InPerson),
            other => Err(KitError::InvalidValue(format!("unknown event type: {other:?}"))),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction quality on the 1–5 scale the rating screen offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rating(u8);

impl Rating {
    /// Every valid rating, in menu order.
    pub const ALL: [Self; 5] = [Self(1), Self(2), Self(3), Self(4), Self(5)];

    /// Build a rating, rejecting values outside 1..=5.
    ///
    /// # Errors
    /// Returns [`KitError::InvalidValue`] when `value` is out of range.
    pub fn new(value: u8) -> Result<Self> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(KitError::InvalidValue(format!("rating {value} outside 1..=5")))
        }
    }

    /// The raw 1–5 value.
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logged interaction, immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Which contact this was with.
    pub contact_id: ContactId,
    /// How it happened.
    pub event_type: EventType,
    /// When it happened.
    pub date: NaiveDate,
    /// How it went.
    pub rating: Rating,
}

/// The in-flight selection the Log Event flow assembles step by step before
/// committing it to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    /// Chosen contact.
    pub contact_id: ContactId,
    /// Chosen contact's name, kept for the confirmation screen.
    pub contact_name: String,
    /// Chosen event type.
    pub event_type: EventType,
    /// Chosen rating.
    pub rating: Rating,
}
