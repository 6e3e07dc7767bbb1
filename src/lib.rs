//! comterm core library.
//!
//! An interactive serial-port terminal: pick a device and line parameters,
//! open a connection, and exchange bytes in raw or hexadecimal form.
//!
//! # Modules
//!
//! - `config`: TOML configuration with environment overrides
//! - `error`: unified error handling at the binary boundary
//! - `port`: device I/O boundary (real serial ports and a mock for tests)
//! - `settings`: typed session settings and their registry
//! - `session`: the open connection and its background read loop
//! - `tui`: ratatui front end (panels, focus, modal overlays)

pub mod config;
pub mod error;
pub mod port;
pub mod session;
pub mod settings;
pub mod tui;

// Re-export commonly used types for convenience
pub use config::{Config, ConfigError, ConfigLoader, ConfigResult};
pub use error::AppError;
pub use port::{
    DataBits, MockSerialPort, Parity, PortError, SerialConfig, SerialPortAdapter, StopBits,
    SyncSerialPort,
};
pub use session::{PortMode, SerialSession, SessionError};
pub use settings::{Setting, SettingValue, SettingsError, SettingsRegistry};
pub use tui::App;
