//! SQLite store of record for contacts and logged events.
//!
//! One database file holds both tables:
//!
//! ```sql
//! CREATE TABLE IF NOT EXISTS contacts (
//!     id                INTEGER PRIMARY KEY,
//!     name              TEXT NOT NULL,
//!     frequency         INTEGER NOT NULL,
//!     last_contact_date TEXT NOT NULL
//! );
//! CREATE TABLE IF NOT EXISTS events (
//!     id         INTEGER PRIMARY KEY AUTOINCREMENT,
//!     contact_id INTEGER NOT NULL,
//!     event_type TEXT NOT NULL,
//!     event_date TEXT NOT NULL,
//!     rating     INTEGER NOT NULL
//! );
//! ```
//!
//! Dates are ISO-8601 (`YYYY-MM-DD`) strings, which keeps the due-contact
//! filter expressible directly in SQL via `julianday`. Contacts are seeded
//! by external tooling; this store never creates or deletes them.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{KitError, Result};
use crate::types::{Contact, ContactId, Event, EventDraft, EventType, Rating};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contacts (
    id                INTEGER PRIMARY KEY,
    name              TEXT NOT NULL,
    frequency         INTEGER NOT NULL,
    last_contact_date TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS events (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    contact_id INTEGER NOT NULL,
    event_type TEXT NOT NULL,
    event_date TEXT NOT NULL,
    rating     INTEGER NOT NULL
);";

/// Handle to the open SQLite database.
pub struct ContactStore {
    conn: Connection,
    db_path: PathBuf,
}

impl std::fmt::Debug for ContactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactStore")
            .field("db_path", &self.db_path)
            .finish_non_exhaustive()
    }
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|e| KitError::InvalidValue(format!("bad stored date {s:?}: {e}")))
}

fn contact_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<(i64, String, i64, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn build_contact(raw: (i64, String, i64, String)) -> Result<Contact> {
    let (id, name, frequency, last) = raw;
    let frequency_days = u32::try_from(frequency)
        .ok()
        .filter(|f| *f > 0)
        .ok_or_else(|| KitError::InvalidValue(format!("bad frequency {frequency} for contact {id}")))?;
    Ok(Contact {
        id: ContactId(id),
        name,
        frequency_days,
        last_contact: parse_date(&last)?,
    })
}

impl ContactStore {
    /// Open (or create) the database at `path` and ensure the schema exists.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures — this is the
    /// "store unreachable" fatal path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db_path = path.as_ref().to_path_buf();
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;

        let conn = Connection::open_with_flags(&db_path, flags)?;

        conn.execute_batch("PRAGMA synchronous = NORMAL;")?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        conn.execute_batch(SCHEMA)?;

        info!(path = %db_path.display(), "contact store opened");

        Ok(Self { conn, db_path })
    }

    /// Open an in-memory database (useful for tests).
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        })
    }

    // ------------------------------------------------------------------
    // Contacts
    // ------------------------------------------------------------------

    /// Every contact, ordered by name (case-insensitive) as the Contacts and
    /// Log Event screens present them.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn all_contacts(&self) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, frequency, last_contact_date
             FROM contacts ORDER BY name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([], contact_from_row)?;

        let mut contacts = Vec::new();
        for row in rows {
            contacts.push(build_contact(row?)?);
        }
        debug!(count = contacts.len(), "loaded all contacts");
        Ok(contacts)
    }

    /// Contacts whose elapsed whole days since last contact meet or exceed
    /// their configured frequency, as of `today`.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn due_contacts(&self, today: NaiveDate) -> Result<Vec<Contact>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, frequency, last_contact_date
             FROM contacts
             WHERE julianday(?1) - julianday(last_contact_date) >= frequency",
        )?;
        let today_str = today.format("%Y-%m-%d").to_string();
        let rows = stmt.query_map(params![today_str], contact_from_row)?;

        let mut due = Vec::new();
        for row in rows {
            due.push(build_contact(row?)?);
        }
        debug!(today = %today, due = due.len(), "computed due contacts");
        Ok(due)
    }

    /// Fetch one contact by id, `None` if it no longer exists.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn contact(&self, id: ContactId) -> Result<Option<Contact>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, name, frequency, last_contact_date FROM contacts WHERE id = ?1",
        )?;
        let raw = stmt.query_row(params![id.0], contact_from_row).optional()?;
        raw.map(build_contact).transpose()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Log an interaction: insert the event row and bump the contact's
    /// `last_contact_date` to `date`, both inside one transaction.
    ///
    /// If the contact row has vanished the update touches zero rows; the
    /// event row is still written and the mismatch is logged rather than
    /// treated as fatal (the appliance has no error screen to show).
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn log_event(&mut self, draft: &EventDraft, date: NaiveDate) -> Result<()> {
        let date_str = date.format("%Y-%m-%d").to_string();
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO events (contact_id, event_type, event_date, rating)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.contact_id.0,
                draft.event_type.as_str(),
                date_str,
                i64::from(draft.rating.value())
            ],
        )?;

        let updated = tx.execute(
            "UPDATE contacts SET last_contact_date = ?1 WHERE id = ?2",
            params![date_str, draft.contact_id.0],
        )?;
        if updated == 0 {
            warn!(contact = %draft.contact_id, "logged event for a contact that no longer exists");
        }

        tx.commit()?;

        info!(
            contact = %draft.contact_id,
            event_type = %draft.event_type,
            rating = %draft.rating,
            date = %date,
            "event logged"
        );
        Ok(())
    }

    /// Every logged event for one contact, oldest first.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures, or
    /// [`KitError::InvalidValue`] for rows written outside the domain.
    pub fn events_for_contact(&self, id: ContactId) -> Result<Vec<Event>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT contact_id, event_type, event_date, rating
             FROM events WHERE contact_id = ?1 ORDER BY event_date, id",
        )?;
        let rows = stmt.query_map(params![id.0], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
            ))
        })?;

        let mut events = Vec::new();
        for row in rows {
            let (contact_id, ty, date, rating) = row?;
            events.push(Event {
                contact_id: ContactId(contact_id),
                event_type: EventType::parse(&ty)?,
                date: parse_date(&date)?,
                rating: Rating::new(u8::try_from(rating).map_err(|_| {
                    KitError::InvalidValue(format!("bad stored rating {rating}"))
                })?)?,
            });
        }
        Ok(events)
    }

    /// Seed helper for tests and provisioning tools: insert a contact row.
    ///
    /// # Errors
    /// Returns [`KitError::Database`] on SQLite failures.
    pub fn insert_contact(
        &self,
        name: &str,
        frequency_days: u32,
        last_contact: NaiveDate,
    ) -> Result<ContactId> {
        self.conn.execute(
            "INSERT INTO contacts (name, frequency, last_contact_date) VALUES (?1, ?2, ?3)",
            params![
                name,
                i64::from(frequency_days),
                last_contact.format("%Y-%m-%d").to_string()
            ],
        )?;
        Ok(ContactId(self.conn.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date")
    }

    fn seeded_store() -> (ContactStore, ContactId, ContactId) {
        let store = ContactStore::open_in_memory().expect("open");
        let a = store.insert_contact("Alice", 7, date("2026-08-01")).expect("seed");
        let b = store.insert_contact("bob", 30, date("2026-08-20")).expect("seed");
        (store, a, b)
    }

    #[test]
    fn all_contacts_sorted_case_insensitively() {
        let (store, _, _) = seeded_store();
        store.insert_contact("Zed", 1, date("2026-01-01")).expect("seed");
        let names: Vec<String> = store
            .all_contacts()
            .expect("query")
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alice", "bob", "Zed"]);
    }

    #[test]
    fn due_filter_meets_or_exceeds_frequency() {
        let (store, a, b) = seeded_store();
        // Alice: 21 days elapsed >= 7 → due. Bob: 2 days elapsed < 30 → not due.
        let due = store.due_contacts(date("2026-08-22")).expect("query");
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, a);

        // Exactly at the boundary counts as due.
        let store2 = ContactStore::open_in_memory().expect("open");
        store2.insert_contact("Edge", 7, date("2026-08-15")).expect("seed");
        let due = store2.due_contacts(date("2026-08-22")).expect("query");
        assert_eq!(due.len(), 1);
        let _ = b;
    }

    #[test]
    fn one_day_short_is_not_due() {
        let store = ContactStore::open_in_memory().expect("open");
        store.insert_contact("Near", 7, date("2026-08-16")).expect("seed");
        assert!(store.due_contacts(date("2026-08-22")).expect("query").is_empty());
    }

    #[test]
    fn log_event_writes_row_and_bumps_last_contact() {
        let (mut store, a, _) = seeded_store();
        let draft = EventDraft {
            contact_id: a,
            contact_name: "Alice".into(),
            event_type: EventType::PhoneCall,
            rating: Rating::new(4).expect("rating"),
        };
        store.log_event(&draft, date("2026-08-22")).expect("log");

        let events = store.events_for_contact(a).expect("query");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, EventType::PhoneCall);
        assert_eq!(events[0].rating.value(), 4);
        assert_eq!(events[0].date, date("2026-08-22"));

        let alice = store.contact(a).expect("query").expect("exists");
        assert_eq!(alice.last_contact, date("2026-08-22"));
    }

    #[test]
    fn log_event_for_vanished_contact_is_tolerated() {
        let (mut store, _, _) = seeded_store();
        let draft = EventDraft {
            contact_id: ContactId(999),
            contact_name: "Ghost".into(),
            event_type: EventType::Email,
            rating: Rating::new(1).expect("rating"),
        };
        store.log_event(&draft, date("2026-08-22")).expect("log should not fail");
        assert_eq!(store.events_for_contact(ContactId(999)).expect("query").len(), 1);
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kit.db");
        {
            let store = ContactStore::open(&path).expect("open");
            store.insert_contact("Keep", 3, date("2026-08-01")).expect("seed");
        }
        let store = ContactStore::open(&path).expect("reopen");
        assert_eq!(store.all_contacts().expect("query").len(), 1);
    }
}
