//! SSD1306 OLED wiring over Linux I2C.

use std::path::Path;

use anyhow::{anyhow, Context};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use linux_embedded_hal::I2cdev;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};
use tracing::{info, warn};

use kit_core::screen::Panel;

type Oled =
    Ssd1306<I2CInterface<I2cdev>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The physical 128x64 panel behind the [`Panel`] trait.
pub struct OledPanel {
    display: Oled,
}

/// Initialise the display on `bus` and clear it.
pub fn open(bus: &Path) -> anyhow::Result<OledPanel> {
    let i2c = I2cdev::new(bus).with_context(|| format!("opening {}", bus.display()))?;
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    display
        .init()
        .map_err(|e| anyhow!("display init failed: {e:?}"))?;
    display.clear_buffer();
    display
        .flush()
        .map_err(|e| anyhow!("display flush failed: {e:?}"))?;

    info!(bus = %bus.display(), "OLED initialised");
    Ok(OledPanel { display })
}

impl DrawTarget for OledPanel {
    type Color = BinaryColor;
    type Error = <Oled as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl OriginDimensions for OledPanel {
    fn size(&self) -> Size {
        Size::new(kit_core::screen::WIDTH, kit_core::screen::HEIGHT)
    }
}

impl Panel for OledPanel {
    fn flush_frame(&mut self) {
        // A dropped frame is recoverable; the next state change redraws.
        if let Err(e) = self.display.flush() {
            warn!("display flush failed: {e:?}");
        }
    }
}
