//! Port abstraction layer for serial communication.
//!
//! Provides the adapter trait the session engine talks to, the real
//! `serialport`-backed implementation, and a mock for tests.

pub mod error;
pub mod mock;
pub mod sync_port;
pub mod traits;

pub use error::PortError;
pub use mock::MockSerialPort;
pub use sync_port::{available_port_names, SyncSerialPort};
pub use traits::{DataBits, Parity, SerialConfig, SerialPortAdapter, StopBits};
