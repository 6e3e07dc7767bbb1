//! Configuration schema definitions.
//!
//! All sections are defined here with serde defaults; a missing file or a
//! partial file both yield a working configuration. Note these are startup
//! defaults for the session settings, not persisted state: nothing is ever
//! written back.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Startup values for the session settings
    pub serial: SerialDefaults,
    /// TUI configuration
    pub tui: TuiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Startup values fed into the settings registry.
///
/// These go through the same `set` path the option picker uses, so the same
/// validation and fallback rules apply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialDefaults {
    /// Preselected device path; empty means "pick one in the UI"
    pub port: Option<String>,
    /// Baud rate
    pub baud: u32,
    /// Data bits (5-8)
    pub data_bits: u8,
    /// Parity: "None", "Odd", "Even", "Mark", "Space"
    pub parity: String,
    /// Stop bits: "1", "1.5", "2"
    pub stop_bits: String,
    /// Display mode: "HEX" or "RAW"
    pub display_mode: String,
    /// Input mode: "HEX" or "RAW"
    pub input_mode: String,
}

impl Default for SerialDefaults {
    fn default() -> Self {
        Self {
            port: None,
            baud: 9600,
            data_bits: 8,
            parity: "None".to_string(),
            stop_bits: "1".to_string(),
            display_mode: "RAW".to_string(),
            input_mode: "RAW".to_string(),
        }
    }
}

impl SerialDefaults {
    /// Seed a settings registry with these startup values.
    ///
    /// Every value flows through the setting's own `set`, so the numeric
    /// validation and the mode fallback quirk apply here exactly as they do
    /// in the option picker.
    pub fn apply_to(
        &self,
        registry: &mut crate::settings::SettingsRegistry,
    ) -> Result<(), crate::settings::SettingsError> {
        use crate::settings::keys;

        if let Some(port) = &self.port {
            registry.get_mut(keys::PORT).set(port)?;
        }
        registry.get_mut(keys::BAUD_RATE).set(&self.baud.to_string())?;
        registry
            .get_mut(keys::DATA_BITS)
            .set(&self.data_bits.to_string())?;
        registry.get_mut(keys::PARITY).set(&self.parity)?;
        registry.get_mut(keys::STOP_BITS).set(&self.stop_bits)?;
        registry.get_mut(keys::DISPLAY_MODE).set(&self.display_mode)?;
        registry.get_mut(keys::INPUT_MODE).set(&self.input_mode)?;
        Ok(())
    }
}

/// TUI configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Theme name: "dark", "light", "nord"
    pub theme: String,
    /// Event-loop tick interval in milliseconds
    pub tick_ms: u64,
    /// Lines kept in the display scrollback
    pub scrollback_lines: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            tick_ms: 33,
            scrollback_lines: 1000,
        }
    }
}

impl TuiConfig {
    /// Get the tick interval as a Duration
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Logging configuration section.
///
/// Stdout belongs to the TUI, so logging is file-only and disabled unless a
/// file is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log file path; `None` disables logging
    pub file: Option<PathBuf>,
    /// Filter directive, e.g. "info" or "comterm=debug"
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: None,
            level: "info".to_string(),
        }
    }
}
