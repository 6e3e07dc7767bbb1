//! Core types and traits for the serial port abstraction.
//!
//! Defines the `SerialPortAdapter` trait that allows both real serial ports
//! and mock implementations to be used interchangeably, plus the line
//! parameter enums and the connect-time [`SerialConfig`] snapshot.

use super::error::PortError;
use std::time::Duration;

/// Line parameters for one device connection, assembled once at connect time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// System path to the device (e.g., "/dev/ttyUSB0" or "COM3").
    pub port: String,

    /// Baud rate (bits per second).
    pub baud_rate: u32,

    /// Number of data bits (5, 6, 7, or 8).
    pub data_bits: DataBits,

    /// Parity checking mode.
    pub parity: Parity,

    /// Number of stop bits.
    pub stop_bits: StopBits,

    /// Read timeout; doubles as the poll interval of the read loop.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: String::new(),
            baud_rate: 9600,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl DataBits {
    /// Map a bit count to the enum; anything outside 5..=8 is `None`.
    pub fn from_count(n: u8) -> Option<Self> {
        match n {
            5 => Some(Self::Five),
            6 => Some(Self::Six),
            7 => Some(Self::Seven),
            8 => Some(Self::Eight),
            _ => None,
        }
    }

    pub fn count(self) -> u8 {
        match self {
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
        }
    }
}

impl std::fmt::Display for DataBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.count())
    }
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Parity checking modes.
///
/// Mark and Space are accepted at the configuration level but rejected at
/// open time: the blocking backend does not implement them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Parity {
    #[default]
    None,
    Odd,
    Even,
    Mark,
    Space,
}

impl std::fmt::Display for Parity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "None",
            Self::Odd => "Odd",
            Self::Even => "Even",
            Self::Mark => "Mark",
            Self::Space => "Space",
        };
        f.write_str(name)
    }
}

/// Number of stop bits.
///
/// `OnePointFive` exists on some UARTs; like mark/space parity it is rejected
/// at open time because the backend only drives 1 or 2 stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopBits {
    #[default]
    One,
    OnePointFive,
    Two,
}

impl std::fmt::Display for StopBits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::One => "1",
            Self::OnePointFive => "1.5",
            Self::Two => "2",
        };
        f.write_str(name)
    }
}

/// Trait for serial port I/O operations.
///
/// This is the entire contract the session engine requires from its
/// environment: read, write, identify, and hand out an independent handle of
/// the same device so the reader thread and the writer never share one.
pub trait SerialPortAdapter: Send + std::fmt::Debug {
    /// Read bytes from the serial port into the provided buffer.
    ///
    /// Returns the number of bytes actually read. An exhausted read timeout
    /// surfaces as `PortError::Io` with kind `TimedOut`.
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError>;

    /// Write bytes to the serial port.
    ///
    /// Returns the number of bytes actually written.
    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError>;

    /// Get the name/path of this serial port.
    fn name(&self) -> &str;

    /// Produce a second handle to the same device.
    ///
    /// The clone shares the underlying device; concurrent read on one handle
    /// and write on the other must be safe. Dropping a handle releases only
    /// that handle.
    fn try_clone_adapter(&self) -> Result<Box<dyn SerialPortAdapter>, PortError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration() {
        let config = SerialConfig::default();
        assert_eq!(config.port, "");
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.read_timeout, Duration::from_millis(100));
    }

    #[test]
    fn data_bits_count_round_trip() {
        for n in 5..=8u8 {
            let bits = DataBits::from_count(n).unwrap();
            assert_eq!(bits.count(), n);
            assert_eq!(bits.to_string(), n.to_string());
        }
        assert!(DataBits::from_count(9).is_none());
        assert!(DataBits::from_count(0).is_none());
    }

    #[test]
    fn data_bits_conversion() {
        let bits: serialport::DataBits = DataBits::Eight.into();
        assert_eq!(bits, serialport::DataBits::Eight);
    }

    #[test]
    fn display_forms_match_candidate_text() {
        assert_eq!(Parity::None.to_string(), "None");
        assert_eq!(Parity::Space.to_string(), "Space");
        assert_eq!(StopBits::OnePointFive.to_string(), "1.5");
        assert_eq!(StopBits::Two.to_string(), "2");
    }
}
