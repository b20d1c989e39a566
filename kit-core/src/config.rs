//! Configuration for the keepintouch appliance.
//!
//! Maps directly to `keepintouch.toml`. Every field has a default, so an
//! empty or missing file yields a fully usable configuration for the stock
//! wiring (BCM pins 17/27/22/23, I2C bus 1).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KitConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Store-of-record settings.
    #[serde(default)]
    pub store: StoreConfig,
    /// Today-set cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Button input settings.
    #[serde(default)]
    pub input: InputConfig,
    /// Screen behavior settings.
    #[serde(default)]
    pub ui: UiConfig,
}

impl KitConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns [`crate::KitError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::KitError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Where the SQLite store of record lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the SQLite database file (created on first run).
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
        }
    }
}

/// Today-set cache artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Path of the day-stamped snapshot file.
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    /// How many due contacts to suggest per day.
    #[serde(default = "default_pick_count")]
    pub pick_count: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            pick_count: default_pick_count(),
        }
    }
}

/// Button wiring and debounce tuning.
///
/// Pin numbers are GPIO line offsets on `gpio_chip` (BCM numbering on a
/// Raspberry Pi). All four buttons are active-low with board pull-ups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// GPIO character device, e.g. `/dev/gpiochip0`.
    #[serde(default = "default_gpio_chip")]
    pub gpio_chip: PathBuf,
    /// Up button line offset.
    #[serde(default = "default_pin_up")]
    pub pin_up: u32,
    /// Down button line offset.
    #[serde(default = "default_pin_down")]
    pub pin_down: u32,
    /// Back button line offset.
    #[serde(default = "default_pin_back")]
    pub pin_back: u32,
    /// Confirm (OK) button line offset.
    #[serde(default = "default_pin_confirm")]
    pub pin_confirm: u32,
    /// Minimum interval between accepted presses, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How often the lines are sampled, in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            gpio_chip: default_gpio_chip(),
            pin_up: default_pin_up(),
            pin_down: default_pin_down(),
            pin_back: default_pin_back(),
            pin_confirm: default_pin_confirm(),
            debounce_ms: default_debounce_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Screen behavior tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long the "Event logged :)" screen stays up, in milliseconds.
    #[serde(default = "default_confirm_dwell_ms")]
    pub confirm_dwell_ms: u64,
    /// I2C bus device for the OLED, e.g. `/dev/i2c-1`.
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: PathBuf,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm_dwell_ms: default_confirm_dwell_ms(),
            i2c_bus: default_i2c_bus(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_log_level() -> String {
    "info".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("contacts_events.db")
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("today_contacts.json")
}

fn default_pick_count() -> usize {
    3
}

fn default_gpio_chip() -> PathBuf {
    PathBuf::from("/dev/gpiochip0")
}

fn default_pin_up() -> u32 {
    17
}

fn default_pin_down() -> u32 {
    27
}

fn default_pin_back() -> u32 {
    22
}

fn default_pin_confirm() -> u32 {
    23
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_poll_interval_ms() -> u64 {
    10
}

fn default_confirm_dwell_ms() -> u64 {
    1000
}

fn default_i2c_bus() -> PathBuf {
    PathBuf::from("/dev/i2c-1")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg = KitConfig::from_toml("").expect("empty config should parse");
        assert_eq!(cfg.cache.pick_count, 3);
        assert_eq!(cfg.input.debounce_ms, 300);
        assert_eq!(cfg.ui.confirm_dwell_ms, 1000);
        assert_eq!(cfg.input.pin_up, 17);
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let cfg = KitConfig::from_toml(
            r#"
            [input]
            debounce_ms = 150
            pin_up = 5
            "#,
        )
        .expect("partial config should parse");
        assert_eq!(cfg.input.debounce_ms, 150);
        assert_eq!(cfg.input.pin_up, 5);
        assert_eq!(cfg.input.pin_down, 27);
        assert_eq!(cfg.store.db_path, PathBuf::from("contacts_events.db"));
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        assert!(KitConfig::from_toml("[input\ndebounce_ms = ").is_err());
    }
}
