//! One setting type per value domain.
//!
//! The canonical state of every variant is its text form; `value()` derives
//! the typed value from that text, falling back to the variant's default when
//! the text is unrecognized. Only the numeric variants validate on `set`; the
//! others accept whatever their own candidate list produced.

use super::{Candidates, Setting, SettingValue, SettingsError};
use crate::port::{self, DataBits, Parity, PortError, StopBits};
use crate::session::PortMode;

/// Baud rates offered by the picker.
const BAUD_CANDIDATES: [&str; 8] = [
    "4800", "9600", "14400", "19200", "28800", "38400", "57600", "115200",
];

const DEFAULT_BAUD: u32 = 9600;

fn string_candidates(items: &[&str]) -> Candidates {
    Candidates::list(items.iter().map(|s| (*s).to_string()).collect())
}

/// Device path. Empty until the operator picks one; candidate enumeration is
/// the single setting that performs I/O and can fail.
pub struct PortSetting {
    text: String,
    lister: fn() -> Result<Vec<String>, PortError>,
}

impl PortSetting {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            lister: port::available_port_names,
        }
    }

    /// Substitute the port enumeration, for tests.
    #[cfg(test)]
    pub(crate) fn with_lister(lister: fn() -> Result<Vec<String>, PortError>) -> Self {
        Self {
            text: String::new(),
            lister,
        }
    }
}

impl Default for PortSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for PortSetting {
    fn name(&self) -> &'static str {
        "Port"
    }

    fn key(&self) -> &'static str {
        super::keys::PORT
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        SettingValue::Text(self.text.clone())
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        let ports = (self.lister)()?;
        Ok(Candidates::list(ports))
    }

    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        self.text = text.to_string();
        Ok(())
    }
}

/// Baud rate; a positive integer from a fixed candidate set.
pub struct BaudRateSetting {
    text: String,
}

impl BaudRateSetting {
    pub fn new() -> Self {
        Self {
            text: DEFAULT_BAUD.to_string(),
        }
    }
}

impl Default for BaudRateSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for BaudRateSetting {
    fn name(&self) -> &'static str {
        "Baud rate"
    }

    fn key(&self) -> &'static str {
        super::keys::BAUD_RATE
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        SettingValue::Baud(self.text.parse().unwrap_or(DEFAULT_BAUD))
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&BAUD_CANDIDATES))
    }

    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        text.parse::<u32>()
            .map_err(|_| SettingsError::NotANumber(text.to_string()))?;
        self.text = text.to_string();
        Ok(())
    }
}

/// Data bits per character, 5 through 8.
pub struct DataBitsSetting {
    text: String,
}

impl DataBitsSetting {
    pub fn new() -> Self {
        Self {
            text: "8".to_string(),
        }
    }
}

impl Default for DataBitsSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for DataBitsSetting {
    fn name(&self) -> &'static str {
        "Data bits"
    }

    fn key(&self) -> &'static str {
        super::keys::DATA_BITS
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        let bits = self
            .text
            .parse::<u8>()
            .ok()
            .and_then(DataBits::from_count)
            .unwrap_or(DataBits::Eight);
        SettingValue::Bits(bits)
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&["5", "6", "7", "8"]))
    }

    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        text.parse::<u8>()
            .map_err(|_| SettingsError::NotANumber(text.to_string()))?;
        self.text = text.to_string();
        Ok(())
    }
}

/// Stop bits: 1, 1.5, or 2.
pub struct StopBitsSetting {
    text: String,
}

impl StopBitsSetting {
    pub fn new() -> Self {
        Self {
            text: "1".to_string(),
        }
    }
}

impl Default for StopBitsSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for StopBitsSetting {
    fn name(&self) -> &'static str {
        "Stop bits"
    }

    fn key(&self) -> &'static str {
        super::keys::STOP_BITS
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        let stop = match self.text.as_str() {
            "1.5" => StopBits::OnePointFive,
            "2" => StopBits::Two,
            _ => StopBits::One,
        };
        SettingValue::Stop(stop)
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&["1", "1.5", "2"]))
    }

    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        self.text = text.to_string();
        Ok(())
    }
}

/// Parity checking mode.
pub struct ParitySetting {
    text: String,
}

impl ParitySetting {
    pub fn new() -> Self {
        Self {
            text: Parity::None.to_string(),
        }
    }
}

impl Default for ParitySetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for ParitySetting {
    fn name(&self) -> &'static str {
        "Parity"
    }

    fn key(&self) -> &'static str {
        super::keys::PARITY
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        let parity = match self.text.as_str() {
            "Odd" => Parity::Odd,
            "Even" => Parity::Even,
            "Mark" => Parity::Mark,
            "Space" => Parity::Space,
            _ => Parity::None,
        };
        SettingValue::Parity(parity)
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&["None", "Odd", "Even", "Mark", "Space"]))
    }

    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        self.text = text.to_string();
        Ok(())
    }
}

fn mode_from_text(text: &str) -> PortMode {
    match text {
        "HEX" => PortMode::Hex,
        _ => PortMode::Raw,
    }
}

/// How received bytes are rendered.
pub struct DisplayModeSetting {
    text: String,
}

impl DisplayModeSetting {
    pub fn new() -> Self {
        Self {
            text: "RAW".to_string(),
        }
    }
}

impl Default for DisplayModeSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for DisplayModeSetting {
    fn name(&self) -> &'static str {
        "Display mode"
    }

    fn key(&self) -> &'static str {
        super::keys::DISPLAY_MODE
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        SettingValue::Mode(mode_from_text(&self.text))
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&["HEX", "RAW"]))
    }

    // Unrecognized text falls back to RAW instead of erroring.
    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        self.text = match text {
            "HEX" | "RAW" => text.to_string(),
            _ => "RAW".to_string(),
        };
        Ok(())
    }
}

/// How the input line is interpreted before writing.
pub struct InputModeSetting {
    text: String,
}

impl InputModeSetting {
    pub fn new() -> Self {
        Self {
            text: "RAW".to_string(),
        }
    }
}

impl Default for InputModeSetting {
    fn default() -> Self {
        Self::new()
    }
}

impl Setting for InputModeSetting {
    fn name(&self) -> &'static str {
        "Input mode"
    }

    fn key(&self) -> &'static str {
        super::keys::INPUT_MODE
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn value(&self) -> SettingValue {
        SettingValue::Mode(mode_from_text(&self.text))
    }

    fn candidates(&self) -> Result<Candidates, SettingsError> {
        Ok(string_candidates(&["HEX", "RAW"]))
    }

    // Same fallback quirk as the display mode.
    fn set(&mut self, text: &str) -> Result<(), SettingsError> {
        self.text = match text {
            "HEX" | "RAW" => text.to_string(),
            _ => "RAW".to_string(),
        };
        Ok(())
    }
}
