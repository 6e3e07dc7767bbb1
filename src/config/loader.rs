//! Configuration loader with file resolution and environment override support.

use super::error::{ConfigError, ConfigResult};
use super::schema::Config;
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
const ENV_PREFIX: &str = "COMTERM";

/// Config file name
const CONFIG_FILE_NAME: &str = "comterm.toml";

/// Environment variable for explicit config path
const CONFIG_PATH_ENV: &str = "COMTERM_CONFIG";

/// Configuration loader with resolution and override logic.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Resolved config file path (if any)
    pub config_path: Option<PathBuf>,
    /// The loaded configuration
    pub config: Config,
}

impl ConfigLoader {
    /// Load configuration using standard resolution order.
    ///
    /// Resolution priority (highest to lowest):
    /// 1. `COMTERM_CONFIG` environment variable (explicit path)
    /// 2. `./comterm.toml` (current directory)
    /// 3. `~/.config/comterm/comterm.toml` (XDG on Linux/macOS) or
    ///    `%APPDATA%\comterm\comterm.toml` (Windows)
    /// 4. Built-in defaults (no file required)
    ///
    /// Environment variables can override config file values.
    pub fn load() -> ConfigResult<Self> {
        let config_path = resolve_config_path();

        let mut config = if let Some(ref path) = config_path {
            load_from_file(path)?
        } else {
            Config::default()
        };

        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut config = load_from_file(&path)?;
        apply_env_overrides(&mut config)?;

        Ok(Self {
            config_path: Some(path),
            config,
        })
    }

    /// Create a loader with default configuration (no file).
    pub fn with_defaults() -> Self {
        let mut config = Config::default();
        // Still apply env overrides even with defaults
        let _ = apply_env_overrides(&mut config);

        Self {
            config_path: None,
            config,
        }
    }

    /// Consume the loader and return the configuration.
    pub fn into_config(self) -> Config {
        self.config
    }
}

/// Resolve the configuration file path using standard locations.
pub fn resolve_config_path() -> Option<PathBuf> {
    // 1. Explicit environment variable
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    // 2. Current directory
    let cwd_config = PathBuf::from(CONFIG_FILE_NAME);
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    // 3. XDG config directory (Linux/macOS) or APPDATA (Windows)
    if let Some(config_dir) = get_config_dir() {
        let app_config = config_dir.join("comterm").join(CONFIG_FILE_NAME);
        if app_config.exists() {
            return Some(app_config);
        }
    }

    // 4. No config file found - will use defaults
    None
}

/// Get the platform-specific config directory.
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }
}

/// Load configuration from a file.
fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&content).map_err(ConfigError::ParseError)
}

/// Apply environment variable overrides to the configuration.
///
/// The pattern is `COMTERM_<SECTION>_<KEY>`, e.g.:
/// - `COMTERM_SERIAL_BAUD=115200`
/// - `COMTERM_TUI_THEME=nord`
/// - `COMTERM_LOGGING_FILE=/tmp/comterm.log`
fn apply_env_overrides(config: &mut Config) -> ConfigResult<()> {
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_SERIAL_PORT")) {
        config.serial.port = Some(val);
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_SERIAL_BAUD")) {
        config.serial.baud = val.parse().map_err(|_| {
            ConfigError::env_parse(format!("{ENV_PREFIX}_SERIAL_BAUD"), "Invalid baud rate")
        })?;
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_TUI_THEME")) {
        config.tui.theme = val;
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_LOGGING_FILE")) {
        config.logging.file = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var(format!("{ENV_PREFIX}_LOGGING_LEVEL")) {
        config.logging.level = val;
    }

    Ok(())
}
