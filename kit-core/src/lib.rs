//! # keepintouch core library
//!
//! Hardware-agnostic heart of the keepintouch appliance: a little desk box
//! with a 128x64 OLED and four buttons that nags its owner to stay in touch
//! with people.
//!
//! The crate is organised leaf-first:
//!
//! - [`types`] — contacts, events, ratings
//! - [`store`] — SQLite store of record (contacts + logged events)
//! - [`suggest`] — which contacts are due, and today's random pick of 3
//! - [`cache`] — the day-stamped snapshot of today's pick
//! - [`menu`] — pure button-driven state machine over the screens
//! - [`screen`] — frame rendering onto any monochrome draw target
//! - [`input`] — debounced button event pump over injectable clock/pins
//! - [`app`] — the forever loop tying the above together
//!
//! Everything here runs and tests on the host; the `kit-device` crate owns
//! the actual GPIO lines and the SSD1306 panel.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod input;
pub mod menu;
pub mod screen;
pub mod store;
pub mod suggest;
pub mod types;

pub use config::KitConfig;
pub use error::{KitError, Result};
pub use types::{Contact, ContactId, Event, EventDraft, EventType, Rating};
