//! Synchronous serial port implementation.
//!
//! Wraps the `serialport` crate's `SerialPort` trait with our own
//! `SerialPortAdapter` trait for dependency injection and testing.

use super::error::PortError;
use super::traits::{Parity, SerialConfig, SerialPortAdapter, StopBits};
use std::io::{Read, Write};

/// Synchronous serial port wrapping `serialport::SerialPort`.
pub struct SyncSerialPort {
    /// The underlying serial port implementation.
    port: Box<dyn serialport::SerialPort>,
    /// The port name/path for identification.
    name: String,
}

impl SyncSerialPort {
    /// Open a serial port with the given line parameters.
    ///
    /// OS-level failures (permission denied, device busy, no such device) are
    /// returned verbatim and never retried. Parity and stop bit settings the
    /// backend cannot drive are rejected here as configuration errors, before
    /// the device is touched.
    ///
    /// # Example
    /// ```no_run
    /// use comterm::port::{SerialConfig, SyncSerialPort};
    ///
    /// let config = SerialConfig {
    ///     port: "/dev/ttyUSB0".into(),
    ///     ..SerialConfig::default()
    /// };
    /// let port = SyncSerialPort::open(&config)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn open(config: &SerialConfig) -> Result<Self, PortError> {
        let parity = match config.parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
            Parity::Mark | Parity::Space => {
                return Err(PortError::config(format!(
                    "{} parity is not supported by this backend",
                    config.parity.to_string().to_lowercase()
                )))
            }
        };
        let stop_bits = match config.stop_bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
            StopBits::OnePointFive => {
                return Err(PortError::config(
                    "1.5 stop bits are not supported by this backend",
                ))
            }
        };

        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(config.data_bits.into())
            .parity(parity)
            .stop_bits(stop_bits)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => PortError::not_found(&config.port),
                serialport::ErrorKind::InvalidInput => PortError::config(e.to_string()),
                _ => PortError::Serial(e),
            })?;

        Ok(Self {
            port,
            name: config.port.clone(),
        })
    }
}

impl SerialPortAdapter for SyncSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        self.port.read(buffer).map_err(PortError::Io)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        self.port.write(data).map_err(PortError::Io)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn try_clone_adapter(&self) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        let clone = self.port.try_clone().map_err(PortError::Serial)?;
        Ok(Box::new(Self {
            port: clone,
            name: self.name.clone(),
        }))
    }
}

impl std::fmt::Debug for SyncSerialPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSerialPort")
            .field("name", &self.name)
            .field("baud_rate", &self.port.baud_rate())
            .finish()
    }
}

/// List the device paths of the serial ports currently present on the system.
///
/// Returns `PortError::NoPortsAvailable` when enumeration succeeds but finds
/// nothing, so callers can surface the empty case as a user-facing message.
pub fn available_port_names() -> Result<Vec<String>, PortError> {
    let ports = serialport::available_ports().map_err(PortError::Serial)?;
    if ports.is_empty() {
        return Err(PortError::NoPortsAvailable);
    }
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_not_found_error() {
        let config = SerialConfig {
            port: "/dev/nonexistent_port_12345".into(),
            ..SerialConfig::default()
        };
        let result = SyncSerialPort::open(&config);

        assert!(result.is_err());
        if let Err(e) = result {
            match e {
                PortError::NotFound(name) => assert!(name.contains("nonexistent")),
                // Some platforms report a bare I/O error instead.
                PortError::Io(_) | PortError::Serial(_) => {}
                other => panic!("unexpected error: {:?}", other),
            }
        }
    }

    #[test]
    fn unsupported_line_settings_rejected_before_open() {
        let config = SerialConfig {
            port: "/dev/nonexistent_port_12345".into(),
            parity: Parity::Mark,
            ..SerialConfig::default()
        };
        match SyncSerialPort::open(&config) {
            Err(PortError::Config(msg)) => assert!(msg.contains("mark parity")),
            other => panic!("expected config error, got {:?}", other),
        }

        let config = SerialConfig {
            port: "/dev/nonexistent_port_12345".into(),
            stop_bits: StopBits::OnePointFive,
            ..SerialConfig::default()
        };
        match SyncSerialPort::open(&config) {
            Err(PortError::Config(msg)) => assert!(msg.contains("1.5 stop bits")),
            other => panic!("expected config error, got {:?}", other),
        }
    }
}
