//! Port-specific error types.
//!
//! Kept separate from application-level errors so the device boundary can be
//! tested and reused without dragging in the rest of the crate.

use thiserror::Error;

/// Errors that can occur during serial port operations.
#[derive(Debug, Error)]
pub enum PortError {
    /// The specified serial port was not found on the system.
    #[error("Serial port not found: {0}")]
    NotFound(String),

    /// An I/O error occurred during port operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Port configuration was rejected before the device was touched.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No serial ports are available on this system.
    #[error("no available ports")]
    NoPortsAvailable,

    /// A serialport-specific error occurred.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
}

impl PortError {
    /// Create a NotFound error from a port name.
    pub fn not_found(port_name: impl Into<String>) -> Self {
        Self::NotFound(port_name.into())
    }

    /// Create a Config error from a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Whether this error is a read timeout rather than a real failure.
    ///
    /// The blocking backend reports an exhausted read timeout as an I/O error;
    /// the read loop treats it as "no data yet" and keeps polling.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Io(e) if e.kind() == std::io::ErrorKind::TimedOut)
    }
}
