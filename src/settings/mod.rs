//! Typed session settings and their registry.
//!
//! Each configurable parameter is one type implementing [`Setting`]: it knows
//! its display name, its canonical text form, its typed value, and how to
//! enumerate the candidate values an operator may pick from. The
//! [`SettingsRegistry`] owns the settings in presentation order and assembles
//! the connect-time [`SerialConfig`] snapshot from their typed values.

pub mod variants;

use crate::port::{DataBits, Parity, PortError, SerialConfig, StopBits};
use crate::session::PortMode;
use std::collections::HashMap;
use thiserror::Error;

pub use variants::{
    BaudRateSetting, DataBitsSetting, DisplayModeSetting, InputModeSetting, ParitySetting,
    PortSetting, StopBitsSetting,
};

/// Stable setting identifiers.
///
/// Unknown-key lookups panic, so call sites use these constants rather than
/// string literals.
pub mod keys {
    pub const PORT: &str = "port";
    pub const BAUD_RATE: &str = "baud_rate";
    pub const STOP_BITS: &str = "stop_bits";
    pub const DATA_BITS: &str = "data_bits";
    pub const PARITY: &str = "parity";
    pub const DISPLAY_MODE: &str = "display_mode";
    pub const INPUT_MODE: &str = "input_mode";
}

/// Errors a setting can report to the operator.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A numeric setting received non-numeric text.
    #[error("not a number: {0:?}")]
    NotANumber(String),

    /// Candidate enumeration hit the device layer and failed.
    #[error(transparent)]
    Port(#[from] PortError),
}

/// Result of a setting's candidate enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidates {
    /// Ordered candidate texts, as shown in the option picker.
    pub items: Vec<String>,
    /// Whether a picker should be presented at all.
    pub present: bool,
}

impl Candidates {
    /// A presentable candidate list.
    pub fn list(items: Vec<String>) -> Self {
        Self {
            items,
            present: true,
        }
    }
}

/// The typed value a setting contributes to the serial configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    Text(String),
    Baud(u32),
    Bits(DataBits),
    Stop(StopBits),
    Parity(Parity),
    Mode(PortMode),
}

impl SettingValue {
    fn into_text(self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    fn as_baud(&self) -> Option<u32> {
        match self {
            Self::Baud(b) => Some(*b),
            _ => None,
        }
    }

    fn as_bits(&self) -> Option<DataBits> {
        match self {
            Self::Bits(b) => Some(*b),
            _ => None,
        }
    }

    fn as_stop(&self) -> Option<StopBits> {
        match self {
            Self::Stop(s) => Some(*s),
            _ => None,
        }
    }

    fn as_parity(&self) -> Option<Parity> {
        match self {
            Self::Parity(p) => Some(*p),
            _ => None,
        }
    }

    fn as_mode(&self) -> Option<PortMode> {
        match self {
            Self::Mode(m) => Some(*m),
            _ => None,
        }
    }
}

/// One configurable session parameter.
///
/// The canonical state is the text form; the typed value is always derivable
/// from it, falling back to the variant's default on unrecognized text rather
/// than failing.
pub trait Setting: Send {
    /// Human label shown in the settings panel.
    fn name(&self) -> &'static str;

    /// Stable identifier, unique within a registry.
    fn key(&self) -> &'static str;

    /// Canonical string form of the current value.
    fn text(&self) -> String;

    /// Typed value derived from the current text. Never fails.
    fn value(&self) -> SettingValue;

    /// Enumerate the values the operator may pick from.
    ///
    /// Fixed-domain settings return the same static ordered list on every
    /// call. The port setting queries the operating system and is the one
    /// variant that can fail here.
    fn candidates(&self) -> Result<Candidates, SettingsError>;

    /// Validate and store a new value from its text form.
    fn set(&mut self, text: &str) -> Result<(), SettingsError>;
}

/// Ordered collection of settings with keyed lookup.
///
/// The order of registration is the presentation order. Key uniqueness and
/// key existence are data-model invariants: violating them is a caller bug
/// and panics rather than producing a user-facing error.
pub struct SettingsRegistry {
    settings: Vec<Box<dyn Setting>>,
    index: HashMap<&'static str, usize>,
}

impl SettingsRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            settings: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The standard registry with all seven session settings in their
    /// presentation order.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(PortSetting::new()));
        registry.register(Box::new(BaudRateSetting::new()));
        registry.register(Box::new(StopBitsSetting::new()));
        registry.register(Box::new(DataBitsSetting::new()));
        registry.register(Box::new(ParitySetting::new()));
        registry.register(Box::new(DisplayModeSetting::new()));
        registry.register(Box::new(InputModeSetting::new()));
        registry
    }

    /// Append a setting. Panics on key collision.
    pub fn register(&mut self, setting: Box<dyn Setting>) {
        let key = setting.key();
        assert!(
            !self.index.contains_key(key),
            "duplicate setting key {key:?}"
        );
        self.index.insert(key, self.settings.len());
        self.settings.push(setting);
    }

    pub fn len(&self) -> usize {
        self.settings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Keyed lookup. Panics on an unknown key.
    pub fn get(&self, key: &str) -> &dyn Setting {
        let idx = *self
            .index
            .get(key)
            .unwrap_or_else(|| panic!("unknown setting key {key:?}"));
        self.settings[idx].as_ref()
    }

    /// Mutable keyed lookup. Panics on an unknown key.
    pub fn get_mut(&mut self, key: &str) -> &mut dyn Setting {
        let idx = *self
            .index
            .get(key)
            .unwrap_or_else(|| panic!("unknown setting key {key:?}"));
        self.settings[idx].as_mut()
    }

    /// Setting at a presentation-order position.
    pub fn get_at(&self, position: usize) -> &dyn Setting {
        self.settings[position].as_ref()
    }

    /// Settings in presentation order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Setting> {
        self.settings.iter().map(|s| s.as_ref())
    }

    /// Assemble the connect-time configuration from the typed values.
    pub fn serial_config(&self) -> SerialConfig {
        SerialConfig {
            port: self
                .get(keys::PORT)
                .value()
                .into_text()
                .expect("port setting holds a text value"),
            baud_rate: self
                .get(keys::BAUD_RATE)
                .value()
                .as_baud()
                .expect("baud_rate setting holds a baud value"),
            data_bits: self
                .get(keys::DATA_BITS)
                .value()
                .as_bits()
                .expect("data_bits setting holds a data bits value"),
            parity: self
                .get(keys::PARITY)
                .value()
                .as_parity()
                .expect("parity setting holds a parity value"),
            stop_bits: self
                .get(keys::STOP_BITS)
                .value()
                .as_stop()
                .expect("stop_bits setting holds a stop bits value"),
            ..SerialConfig::default()
        }
    }

    /// The display mode a new session should start with.
    pub fn display_mode(&self) -> PortMode {
        self.get(keys::DISPLAY_MODE)
            .value()
            .as_mode()
            .expect("display_mode setting holds a mode value")
    }

    /// The input mode a new session should start with.
    pub fn input_mode(&self) -> PortMode {
        self.get(keys::INPUT_MODE)
            .value()
            .as_mode()
            .expect("input_mode setting holds a mode value")
    }

    /// `"name: value"` lines in presentation order, for display only.
    pub fn summary(&self) -> Vec<String> {
        self.settings
            .iter()
            .map(|s| format!("{}: {}", s.name(), s.text()))
            .collect()
    }
}

impl Default for SettingsRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn registration_order_is_presentation_order() {
        let registry = SettingsRegistry::with_defaults();
        let order: Vec<&str> = registry.iter().map(|s| s.key()).collect();
        assert_eq!(
            order,
            vec![
                keys::PORT,
                keys::BAUD_RATE,
                keys::STOP_BITS,
                keys::DATA_BITS,
                keys::PARITY,
                keys::DISPLAY_MODE,
                keys::INPUT_MODE,
            ]
        );
    }

    #[test]
    #[should_panic(expected = "duplicate setting key")]
    fn duplicate_key_panics() {
        let mut registry = SettingsRegistry::with_defaults();
        registry.register(Box::new(BaudRateSetting::new()));
    }

    #[test]
    #[should_panic(expected = "unknown setting key")]
    fn unknown_key_panics() {
        let registry = SettingsRegistry::with_defaults();
        let _ = registry.get("flow_control");
    }

    #[test]
    fn serial_config_snapshot_from_defaults() {
        let mut registry = SettingsRegistry::with_defaults();
        registry.get_mut(keys::PORT).set("/dev/ttyUSB0").unwrap();
        registry.get_mut(keys::BAUD_RATE).set("9600").unwrap();

        let config = registry.serial_config();
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.stop_bits, StopBits::One);
    }

    #[test]
    fn summary_renders_names_and_text() {
        let registry = SettingsRegistry::with_defaults();
        let summary = registry.summary();
        assert_eq!(summary[0], "Port: ");
        assert_eq!(summary[1], "Baud rate: 9600");
        assert_eq!(summary[4], "Parity: None");
        assert_eq!(summary[5], "Display mode: RAW");
    }

    #[test]
    fn mode_accessors_reflect_settings() {
        let mut registry = SettingsRegistry::with_defaults();
        assert_eq!(registry.display_mode(), PortMode::Raw);

        registry.get_mut(keys::DISPLAY_MODE).set("HEX").unwrap();
        registry.get_mut(keys::INPUT_MODE).set("HEX").unwrap();
        assert_eq!(registry.display_mode(), PortMode::Hex);
        assert_eq!(registry.input_mode(), PortMode::Hex);
    }
}
