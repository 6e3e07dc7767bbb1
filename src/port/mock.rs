//! Mock serial port implementation for testing.
//!
//! Provides a `MockSerialPort` that simulates serial port behavior without
//! requiring actual hardware. Clones share the same device state, which is
//! exactly the semantics `try_clone_adapter` promises, so the mock can stand
//! in for a real port under the session's reader thread.

use super::error::PortError;
use super::traits::SerialPortAdapter;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Inner state of the mock port, protected by a mutex for interior mutability.
#[derive(Debug, Default)]
struct MockPortState {
    /// Queue of bytes to be returned by read operations.
    read_queue: VecDeque<u8>,
    /// Log of all bytes written to the port.
    write_log: Vec<Vec<u8>>,
    /// When set, every read fails with this I/O error kind.
    fail_reads: Option<std::io::ErrorKind>,
    /// When set, every write fails with this I/O error kind.
    fail_writes: Option<std::io::ErrorKind>,
}

/// Mock serial port implementation for testing.
///
/// # Example
/// ```
/// use comterm::port::{MockSerialPort, SerialPortAdapter};
///
/// let mut port = MockSerialPort::new("MOCK0");
/// port.enqueue_read(b"Hello, World!");
///
/// let mut buffer = [0u8; 13];
/// let n = port.read_bytes(&mut buffer).unwrap();
/// assert_eq!(&buffer[..n], b"Hello, World!");
///
/// port.write_bytes(b"Response").unwrap();
/// assert_eq!(port.write_log(), vec![b"Response".to_vec()]);
/// ```
#[derive(Debug, Clone)]
pub struct MockSerialPort {
    /// The port name/identifier.
    name: String,
    /// The internal state, shared between clones like a real device.
    state: Arc<Mutex<MockPortState>>,
}

impl MockSerialPort {
    /// Create a new mock serial port with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Arc::new(Mutex::new(MockPortState::default())),
        }
    }

    /// Enqueue bytes to be returned by subsequent read operations.
    pub fn enqueue_read(&self, data: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state.read_queue.extend(data);
    }

    /// Make every subsequent read fail with the given I/O error kind.
    ///
    /// Simulates a device disappearing mid-session.
    pub fn fail_reads(&self, kind: std::io::ErrorKind) {
        self.state.lock().unwrap().fail_reads = Some(kind);
    }

    /// Make every subsequent write fail with the given I/O error kind.
    pub fn fail_writes(&self, kind: std::io::ErrorKind) {
        self.state.lock().unwrap().fail_writes = Some(kind);
    }

    /// Get a copy of all data written to the port.
    pub fn write_log(&self) -> Vec<Vec<u8>> {
        self.state.lock().unwrap().write_log.clone()
    }

    /// All written bytes flattened into one buffer, in write order.
    pub fn written_bytes(&self) -> Vec<u8> {
        self.state.lock().unwrap().write_log.concat()
    }
}

impl SerialPortAdapter for MockSerialPort {
    fn read_bytes(&mut self, buffer: &mut [u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if let Some(kind) = state.fail_reads {
            return Err(PortError::Io(std::io::Error::new(kind, "mock read failure")));
        }

        // An empty queue behaves like a real port with nothing to say: the
        // read timeout expires. Pause briefly so a polling read loop does
        // not spin.
        if state.read_queue.is_empty() {
            drop(state);
            std::thread::sleep(std::time::Duration::from_millis(1));
            return Err(PortError::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "mock read timed out",
            )));
        }

        let n = buffer.len().min(state.read_queue.len());
        for slot in buffer.iter_mut().take(n) {
            *slot = state.read_queue.pop_front().expect("length checked above");
        }
        Ok(n)
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<usize, PortError> {
        let mut state = self.state.lock().unwrap();

        if let Some(kind) = state.fail_writes {
            return Err(PortError::Io(std::io::Error::new(kind, "mock write failure")));
        }

        state.write_log.push(data.to_vec());
        Ok(data.len())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn try_clone_adapter(&self) -> Result<Box<dyn SerialPortAdapter>, PortError> {
        Ok(Box::new(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_drains_queue_in_order() {
        let mut port = MockSerialPort::new("MOCK0");
        port.enqueue_read(b"abc");
        port.enqueue_read(b"def");

        let mut buf = [0u8; 4];
        let n = port.read_bytes(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"abcd");

        let n = port.read_bytes(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"ef");
    }

    #[test]
    fn empty_queue_reads_time_out() {
        let mut port = MockSerialPort::new("MOCK0");
        let mut buf = [0u8; 8];
        let err = port.read_bytes(&mut buf).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn clones_share_device_state() {
        let port = MockSerialPort::new("MOCK0");
        let mut reader = port.try_clone_adapter().unwrap();

        port.enqueue_read(b"xyz");
        let mut buf = [0u8; 3];
        let n = reader.read_bytes(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"xyz");

        reader.write_bytes(b"ok").unwrap();
        assert_eq!(port.write_log(), vec![b"ok".to_vec()]);
    }

    #[test]
    fn injected_failures_surface_as_io_errors() {
        let mut port = MockSerialPort::new("MOCK0");
        port.fail_reads(std::io::ErrorKind::BrokenPipe);
        port.fail_writes(std::io::ErrorKind::PermissionDenied);

        let mut buf = [0u8; 1];
        let err = port.read_bytes(&mut buf).unwrap_err();
        assert!(!err.is_timeout());
        assert!(port.write_bytes(b"x").is_err());
    }
}
