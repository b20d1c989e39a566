//! GPIO button wiring.
//!
//! Four push buttons on GPIO character-device lines, active-low with board
//! pull-ups: a pressed button pulls its line low. This module only converts
//! line levels to [`ButtonLevels`]; edge detection and debouncing live in
//! `kit-core`'s event pump.

use anyhow::Context;
use embedded_hal::digital::InputPin;
use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
use linux_embedded_hal::CdevPin;
use tracing::info;

use kit_core::config::InputConfig;
use kit_core::input::{ButtonLevels, ButtonPoller};
use kit_core::KitError;

const CONSUMER: &str = "keepintouch";

/// The four wired buttons as one pollable unit.
pub struct GpioButtons {
    up: CdevPin,
    down: CdevPin,
    back: CdevPin,
    confirm: CdevPin,
}

fn request(chip: &mut Chip, offset: u32) -> anyhow::Result<CdevPin> {
    let handle = chip
        .get_line(offset)
        .with_context(|| format!("no GPIO line {offset}"))?
        .request(LineRequestFlags::INPUT, 0, CONSUMER)
        .with_context(|| format!("GPIO line {offset} busy"))?;
    CdevPin::new(handle).with_context(|| format!("GPIO line {offset} unusable"))
}

impl GpioButtons {
    /// Claim the four configured lines as inputs.
    pub fn open(config: &InputConfig) -> anyhow::Result<Self> {
        let mut chip = Chip::new(&config.gpio_chip)
            .with_context(|| format!("opening {}", config.gpio_chip.display()))?;

        let buttons = Self {
            up: request(&mut chip, config.pin_up)?,
            down: request(&mut chip, config.pin_down)?,
            back: request(&mut chip, config.pin_back)?,
            confirm: request(&mut chip, config.pin_confirm)?,
        };
        info!(
            chip = %config.gpio_chip.display(),
            up = config.pin_up,
            down = config.pin_down,
            back = config.pin_back,
            confirm = config.pin_confirm,
            "buttons wired"
        );
        Ok(buttons)
    }
}

fn level(pin: &mut CdevPin) -> kit_core::Result<bool> {
    // Active-low: pressed pulls the line to ground.
    pin.is_low()
        .map_err(|e| KitError::Io(std::io::Error::other(format!("GPIO read: {e:?}"))))
}

impl ButtonPoller for GpioButtons {
    fn sample(&mut self) -> kit_core::Result<ButtonLevels> {
        Ok(ButtonLevels {
            up: level(&mut self.up)?,
            down: level(&mut self.down)?,
            back: level(&mut self.back)?,
            confirm: level(&mut self.confirm)?,
        })
    }
}
