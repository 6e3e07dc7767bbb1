//! Configuration module.
//!
//! TOML-based ambient configuration with environment variable overrides:
//! startup defaults for the session settings, TUI options, and logging.
//! Resolution order is `COMTERM_CONFIG`, `./comterm.toml`, then the platform
//! config directory; a missing file means built-in defaults. Nothing is ever
//! written back; session settings are not persisted across runs.

mod error;
mod loader;
mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{resolve_config_path, ConfigLoader};
pub use schema::{Config, LoggingConfig, SerialDefaults, TuiConfig};
