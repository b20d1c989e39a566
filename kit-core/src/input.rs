//! Debounced button input.
//!
//! The hardware layer only has to answer one question: which of the four
//! lines are pressed right now ([`ButtonPoller::sample`]). The [`EventPump`]
//! turns those level samples into discrete press events by
//!
//! - reporting a button only on a released→pressed edge, and
//! - enforcing a minimum interval between accepted events (the debounce),
//!
//! instead of sleeping inside the handlers. Both the clock and the pins are
//! injected, so the pump runs against fakes in tests with no wall-clock
//! delays.

use std::time::Duration;

use tracing::trace;

use crate::error::Result;
use crate::menu::Button;

/// Instantaneous pressed/released levels of the four buttons.
///
/// `true` means pressed; the device layer owns the active-low conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonLevels {
    /// Up line.
    pub up: bool,
    /// Down line.
    pub down: bool,
    /// Back line.
    pub back: bool,
    /// Confirm line.
    pub confirm: bool,
}

impl ButtonLevels {
    fn pressed(self, button: Button) -> bool {
        match button {
            Button::Up => self.up,
            Button::Down => self.down,
            Button::Back => self.back,
            Button::Confirm => self.confirm,
        }
    }
}

/// Sampling order doubles as priority when two buttons land in one sample.
const SAMPLE_ORDER: [Button; 4] = [Button::Up, Button::Down, Button::Back, Button::Confirm];

/// One instantaneous sample of the button lines.
pub trait ButtonPoller {
    /// Read all four lines.
    ///
    /// # Errors
    /// Surfaces I/O failures from the GPIO layer.
    fn sample(&mut self) -> Result<ButtonLevels>;
}

/// Injectable time source.
pub trait Clock {
    /// Monotonic time since an arbitrary epoch.
    fn now(&self) -> Duration;
    /// Block for `duration`.
    fn sleep(&mut self, duration: Duration);
}

/// Real clock over [`std::time::Instant`] and [`std::thread::sleep`].
#[derive(Debug)]
pub struct SystemClock {
    start: std::time::Instant,
}

impl SystemClock {
    /// A clock whose epoch is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Blocking, debounced source of button press events.
#[derive(Debug)]
pub struct EventPump<P, C> {
    poller: P,
    clock: C,
    debounce: Duration,
    poll_interval: Duration,
    held: ButtonLevels,
    last_accepted: Option<Duration>,
}

impl<P: ButtonPoller, C: Clock> EventPump<P, C> {
    /// Pump over `poller`/`clock` with the given debounce and sampling
    /// interval.
    pub fn new(poller: P, clock: C, debounce: Duration, poll_interval: Duration) -> Self {
        Self {
            poller,
            clock,
            debounce,
            poll_interval,
            held: ButtonLevels::default(),
            last_accepted: None,
        }
    }

    /// Block until the next accepted button press.
    ///
    /// # Errors
    /// Surfaces GPIO sampling failures.
    pub fn next_press(&mut self) -> Result<Button> {
        loop {
            let levels = self.poller.sample()?;
            let edge = SAMPLE_ORDER
                .into_iter()
                .find(|b| levels.pressed(*b) && !self.held.pressed(*b));
            self.held = levels;

            if let Some(button) = edge {
                let now = self.clock.now();
                let accept = self
                    .last_accepted
                    .is_none_or(|last| now.saturating_sub(last) >= self.debounce);
                if accept {
                    self.last_accepted = Some(now);
                    trace!(?button, at = ?now, "button press accepted");
                    return Ok(button);
                }
                trace!(?button, at = ?now, "button press inside debounce window, dropped");
            }

            self.clock.sleep(self.poll_interval);
        }
    }

    /// Block for `duration` on the pump's clock (used for the confirmation
    /// screen dwell).
    pub fn dwell(&mut self, duration: Duration) {
        self.clock.sleep(duration);
    }
}
