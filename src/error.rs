//! Unified application error type.
//!
//! Layer-specific errors (`PortError`, `SettingsError`, `SessionError`,
//! `ConfigError`) stay close to their modules; this type aggregates them at
//! the binary boundary so `main` can propagate any of them with `?`.

use crate::config::ConfigError;
use crate::session::SessionError;
use crate::settings::SettingsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
