//! The application loop.
//!
//! One screen is active at a time; the loop renders it, blocks on the next
//! debounced button press, feeds it through the [`Menu`], and services
//! whatever [`UiRequest`] falls out against the store and the daily cache.
//! It runs until the process is killed — the appliance has no off switch in
//! software. The only way out is a store failure, which is fatal by design.

use std::time::Duration;

use chrono::Local;
use tracing::info;

use crate::cache::DailyCache;
use crate::config::KitConfig;
use crate::error::Result;
use crate::input::{ButtonPoller, Clock, EventPump};
use crate::menu::{Menu, UiRequest};
use crate::screen::{self, Panel};
use crate::store::ContactStore;

/// The wired-together appliance, minus the hardware.
pub struct App {
    store: ContactStore,
    cache: DailyCache,
    menu: Menu,
    confirm_dwell: Duration,
}

impl App {
    /// Assemble the appliance from an open store and its configuration.
    #[must_use]
    pub fn new(store: ContactStore, config: &KitConfig) -> Self {
        Self {
            store,
            cache: DailyCache::new(&config.cache.path, config.cache.pick_count),
            menu: Menu::new(),
            confirm_dwell: Duration::from_millis(config.ui.confirm_dwell_ms),
        }
    }

    /// The menu state machine (exposed for tests).
    #[must_use]
    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// The underlying store (exposed for tests).
    #[must_use]
    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    /// Run forever: render, wait for a press, transition.
    ///
    /// # Errors
    /// Returns the first store or input failure; both are fatal.
    pub fn run<B, C, P>(&mut self, pump: &mut EventPump<B, C>, panel: &mut P) -> Result<()>
    where
        B: ButtonPoller,
        C: Clock,
        P: Panel,
    {
        info!("appliance loop starting");
        screen::draw(panel, self.menu.screen());
        loop {
            self.step(pump, panel)?;
        }
    }

    /// Advance by exactly one button press. The building block of [`run`],
    /// and the hook the integration tests drive the appliance through.
    ///
    /// [`run`]: App::run
    ///
    /// # Errors
    /// Returns the first store or input failure.
    pub fn step<B, C, P>(&mut self, pump: &mut EventPump<B, C>, panel: &mut P) -> Result<()>
    where
        B: ButtonPoller,
        C: Clock,
        P: Panel,
    {
        let button = pump.next_press()?;
        if let Some(request) = self.menu.press(button) {
            self.service(request, pump, panel)?;
        }
        screen::draw(panel, self.menu.screen());
        Ok(())
    }

    fn service<B, C, P>(
        &mut self,
        request: UiRequest,
        pump: &mut EventPump<B, C>,
        panel: &mut P,
    ) -> Result<()>
    where
        B: ButtonPoller,
        C: Clock,
        P: Panel,
    {
        let today = Local::now().date_naive();
        match request {
            UiRequest::LoadToday => {
                let mut rng = rand::thread_rng();
                let set = self.cache.today_contacts(&self.store, &mut rng, today)?;
                self.menu.enter_today(set);
            }
            UiRequest::LoadContacts => {
                let contacts = self.store.all_contacts()?;
                self.menu.enter_contacts(contacts);
            }
            UiRequest::LoadLogEvent => {
                let contacts = self.store.all_contacts()?;
                self.menu.enter_log_event(contacts);
            }
            UiRequest::Commit(draft) => {
                self.store.log_event(&draft, today)?;
                self.menu.event_committed(draft.contact_name);
                // Let the splash sit for its dwell before falling back to
                // the main menu.
                screen::draw(panel, self.menu.screen());
                pump.dwell(self.confirm_dwell);
                self.menu.dismiss_confirmation();
            }
        }
        Ok(())
    }
}
