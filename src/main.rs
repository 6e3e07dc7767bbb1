//! comterm binary entry point.
//!
//! Loads configuration, seeds the settings registry, sets up file logging,
//! and hands control to the TUI main loop.

use clap::Parser;
use comterm::config::{Config, ConfigLoader};
use comterm::error::AppError;
use comterm::settings::SettingsRegistry;
use comterm::tui::App;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "An interactive terminal for serial port communication.",
    long_about = "Pick a device and line parameters, open a connection, and exchange \
bytes with the device in raw or hexadecimal representation. Settings are edited in the \
TUI; this command line only sets startup values."
)]
struct Args {
    /// Explicit configuration file path.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Preselect the device path (e.g. /dev/ttyUSB0 or COM3).
    #[arg(short, long)]
    port: Option<String>,

    /// Startup baud rate.
    #[arg(short, long)]
    baud: Option<u32>,

    /// Log file; logging is disabled without one (stdout belongs to the TUI).
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path)?.into_config(),
        None => match ConfigLoader::load() {
            Ok(loader) => loader.into_config(),
            Err(e) => {
                eprintln!("Warning: failed to load config, using defaults: {e}");
                ConfigLoader::with_defaults().into_config()
            }
        },
    };

    // CLI flags win over file and environment.
    if let Some(port) = args.port {
        config.serial.port = Some(port);
    }
    if let Some(baud) = args.baud {
        config.serial.baud = baud;
    }
    if let Some(log_file) = args.log_file {
        config.logging.file = Some(log_file);
    }

    // Keep the non-blocking writer alive for the whole run.
    let _log_guard = init_logging(&config)?;

    let mut registry = SettingsRegistry::with_defaults();
    config.serial.apply_to(&mut registry)?;

    let mut app = App::new(config, registry);
    app.run()?;
    Ok(())
}

/// Route tracing output to the configured file, if any.
fn init_logging(config: &Config) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>, AppError> {
    let Some(path) = &config.logging.file else {
        return Ok(None);
    };

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone())),
        )
        .with_writer(writer)
        .with_ansi(false)
        .init();

    Ok(Some(guard))
}
