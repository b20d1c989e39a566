//! Daily contact suggestions.
//!
//! A contact is *due* when the whole days elapsed since its last logged
//! interaction meet or exceed its configured frequency. Out of the due pool
//! the appliance suggests at most [`PICK_COUNT`] contacts per day, sampled
//! uniformly without replacement.

use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::types::Contact;

/// How many contacts the Today screen suggests at most.
pub const PICK_COUNT: usize = 3;

/// Whether `contact` is due for a catch-up as of `today`.
///
/// Mirrors the store-side SQL filter; kept here so the property tests can
/// pin the predicate down without a database.
#[must_use]
pub fn is_due(contact: &Contact, today: NaiveDate) -> bool {
    let elapsed = (today - contact.last_contact).num_days();
    elapsed >= i64::from(contact.frequency_days)
}

/// Pick today's suggestions from the due pool.
///
/// Returns the whole pool when it holds `count` contacts or fewer, otherwise
/// a uniform random sample of exactly `count` without replacement. Order of
/// the result is implementation-defined.
#[must_use]
pub fn pick_today<R: Rng>(due: Vec<Contact>, count: usize, rng: &mut R) -> Vec<Contact> {
    if due.len() <= count {
        return due;
    }
    let picked: Vec<Contact> = due.choose_multiple(rng, count).cloned().collect();
    debug!(pool = due.len(), picked = picked.len(), "sampled today's contacts");
    picked
}
