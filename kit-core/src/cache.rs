//! Day-stamped cache of today's suggested contacts.
//!
//! The today-set is computed once per calendar day and written to a small
//! JSON snapshot file. The file's filesystem mtime is the sole validity
//! signal: if its local calendar date differs from today's, the snapshot is
//! stale and the set is recomputed. A missing, unreadable, or corrupt
//! snapshot is just a cache miss — never an error the user sees.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::Result;
use crate::store::ContactStore;
use crate::suggest;
use crate::types::Contact;

/// The cache artifact and its freshness policy.
#[derive(Debug, Clone)]
pub struct DailyCache {
    path: PathBuf,
    pick_count: usize,
}

impl DailyCache {
    /// Cache backed by the snapshot file at `path`, suggesting up to
    /// `pick_count` contacts per day.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P, pick_count: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pick_count,
        }
    }

    /// The snapshot's mtime as a local calendar date, if the file exists.
    fn stamp_date(&self) -> Option<NaiveDate> {
        let modified = fs::metadata(&self.path).ok()?.modified().ok()?;
        Some(DateTime::<Local>::from(modified).date_naive())
    }

    /// Load the cached today-set, honouring the freshness policy.
    ///
    /// Returns `None` when the snapshot is absent, stamped on a different
    /// day than `today`, unreadable, or corrupt.
    #[must_use]
    pub fn load(&self, today: NaiveDate) -> Option<Vec<Contact>> {
        match self.stamp_date() {
            Some(stamp) if stamp == today => {}
            Some(stamp) => {
                debug!(stamp = %stamp, today = %today, "today-set snapshot is stale");
                return None;
            }
            None => return None,
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable today-set snapshot, recomputing");
                return None;
            }
        };
        match serde_json::from_slice(&bytes) {
            Ok(contacts) => {
                debug!(path = %self.path.display(), "loaded today-set from snapshot");
                Some(contacts)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "corrupt today-set snapshot, recomputing");
                None
            }
        }
    }

    /// Overwrite the snapshot with `contacts`, freshening its mtime stamp.
    ///
    /// Save failures are logged and swallowed: losing the snapshot only
    /// costs a recomputation on the next access.
    pub fn save(&self, contacts: &[Contact]) {
        let json = match serde_json::to_vec(contacts) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "failed to encode today-set snapshot");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, json) {
            warn!(path = %self.path.display(), error = %e, "failed to write today-set snapshot");
        }
    }

    /// Today's suggested contacts: the fresh cached set if one exists,
    /// otherwise recomputed from the store and cached.
    ///
    /// # Errors
    /// Propagates store failures (fatal); cache failures never surface.
    pub fn today_contacts<R: Rng>(
        &self,
        store: &ContactStore,
        rng: &mut R,
        today: NaiveDate,
    ) -> Result<Vec<Contact>> {
        if let Some(cached) = self.load(today) {
            return Ok(cached);
        }

        let due = store.due_contacts(today)?;
        let picked = suggest::pick_today(due, self.pick_count, rng);
        self.save(&picked);
        debug!(today = %today, count = picked.len(), "recomputed today-set");
        Ok(picked)
    }
}
