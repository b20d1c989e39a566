//! keepintouch appliance entry point.
//!
//! Wires the hardware (GPIO buttons, SSD1306 OLED) to the `kit-core`
//! application loop and runs it forever. Configuration comes from the TOML
//! file named by `KIT_CONFIG` (default `keepintouch.toml`); a missing file
//! means stock defaults.

mod buttons;
mod oled;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kit_core::app::App;
use kit_core::input::{EventPump, SystemClock};
use kit_core::store::ContactStore;
use kit_core::KitConfig;

use buttons::GpioButtons;

fn load_config() -> anyhow::Result<KitConfig> {
    let path = std::env::var_os("KIT_CONFIG")
        .map_or_else(|| PathBuf::from("keepintouch.toml"), PathBuf::from);
    if path.exists() {
        KitConfig::from_file(&path).with_context(|| format!("loading {}", path.display()))
    } else {
        Ok(KitConfig::default())
    }
}

fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    let filter = EnvFilter::try_new(&config.general.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(db = %config.store.db_path.display(), "keepintouch starting");

    let store = ContactStore::open(&config.store.db_path).context("opening contact store")?;
    let mut app = App::new(store, &config);

    let gpio = GpioButtons::open(&config.input).context("wiring buttons")?;
    let mut pump = EventPump::new(
        gpio,
        SystemClock::new(),
        Duration::from_millis(config.input.debounce_ms),
        Duration::from_millis(config.input.poll_interval_ms),
    );
    let mut panel = oled::open(&config.ui.i2c_bus).context("wiring display")?;

    // Runs until the process is killed.
    app.run(&mut pump, &mut panel).context("appliance loop")?;
    Ok(())
}
