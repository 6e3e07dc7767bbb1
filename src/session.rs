//! Serial session engine.
//!
//! A [`SerialSession`] owns one open device connection: the writer handle, the
//! display/input modes frozen at connect time, and the background read loop.
//! The lifecycle is Idle -> Running -> Closed; Closed is terminal and a new
//! session must be opened to reconnect.

use crate::port::{PortError, SerialConfig, SerialPortAdapter, SyncSerialPort};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use thiserror::Error;
use tracing::{debug, info, warn};

/// How bytes are rendered on screen and interpreted from the input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortMode {
    /// Two lowercase hex characters per byte, no separator.
    Hex,
    /// Bytes passed through verbatim.
    #[default]
    Raw,
}

/// Size of the read loop's scratch buffer.
const READ_CHUNK: usize = 512;

/// Errors produced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Hex input could not be decoded (odd length or non-hex character).
    #[error("invalid hex input: {0}")]
    HexDecode(#[from] hex::FromHexError),

    /// The underlying device failed.
    #[error(transparent)]
    Port(#[from] PortError),

    /// `start_reading` was invoked more than once for this session.
    #[error("read loop already started")]
    AlreadyReading,
}

/// One open device connection.
///
/// The session holds the writer handle; the read loop runs on a dedicated
/// thread with its own clone of the device handle, so reads never contend
/// with writes. The only shared mutable state is the `running` flag.
pub struct SerialSession {
    port: Option<Box<dyn SerialPortAdapter>>,
    display_mode: PortMode,
    input_mode: PortMode,
    running: Arc<AtomicBool>,
    reader: Option<JoinHandle<()>>,
}

impl SerialSession {
    /// Open the device described by `config`.
    ///
    /// The modes are copied from the caller's settings at connect time and are
    /// not live-linked: changing a setting afterwards does not affect a
    /// running session. OS open failures are returned verbatim, never retried.
    pub fn open(
        config: &SerialConfig,
        display_mode: PortMode,
        input_mode: PortMode,
    ) -> Result<Self, PortError> {
        let port = SyncSerialPort::open(config)?;
        info!(port = %config.port, baud = config.baud_rate, "serial port opened");
        Ok(Self::from_adapter(Box::new(port), display_mode, input_mode))
    }

    /// Build a session around an already-open adapter.
    ///
    /// This is the dependency-injection seam: tests drive the full session
    /// lifecycle against a [`crate::port::MockSerialPort`].
    pub fn from_adapter(
        port: Box<dyn SerialPortAdapter>,
        display_mode: PortMode,
        input_mode: PortMode,
    ) -> Self {
        Self {
            port: Some(port),
            display_mode,
            input_mode,
            running: Arc::new(AtomicBool::new(true)),
            reader: None,
        }
    }

    /// Whether the session is still alive.
    ///
    /// Flips to false on `close` and also when the read loop dies on a device
    /// error, so a vanished device is observable without issuing another
    /// operation.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// The display mode frozen at connect time.
    pub fn display_mode(&self) -> PortMode {
        self.display_mode
    }

    /// Spawn the background read loop. Must be called exactly once.
    ///
    /// The loop reads up to 512 bytes at a time. In Hex display mode the
    /// bytes forwarded to `sink` are the lowercase hex encoding of the data;
    /// in Raw mode they are the data itself. The sink runs on the reader
    /// thread and must only enqueue; the TUI passes its event-channel sender.
    ///
    /// A read timeout polls the `running` flag and continues. Any other read
    /// error ends the loop and marks the session dead.
    pub fn start_reading<F>(&mut self, mut sink: F) -> Result<(), SessionError>
    where
        F: FnMut(Vec<u8>) + Send + 'static,
    {
        if self.reader.is_some() {
            return Err(SessionError::AlreadyReading);
        }
        let port = self.port.as_ref().ok_or(PortError::config("session is closed"))?;
        let mut reader = port.try_clone_adapter()?;
        let running = Arc::clone(&self.running);
        let display_mode = self.display_mode;

        let handle = std::thread::Builder::new()
            .name("comterm-reader".into())
            .spawn(move || {
                let mut buf = [0u8; READ_CHUNK];
                while running.load(Ordering::Acquire) {
                    match reader.read_bytes(&mut buf) {
                        Ok(0) => continue,
                        Ok(n) => {
                            let payload = match display_mode {
                                PortMode::Hex => hex::encode(&buf[..n]).into_bytes(),
                                PortMode::Raw => buf[..n].to_vec(),
                            };
                            sink(payload);
                        }
                        Err(e) if e.is_timeout() => continue,
                        Err(e) => {
                            warn!(error = %e, "read loop terminated by device error");
                            running.store(false, Ordering::Release);
                            break;
                        }
                    }
                }
                debug!("read loop exited");
            })
            .map_err(|e| SessionError::Port(PortError::Io(e)))?;

        self.reader = Some(handle);
        Ok(())
    }

    /// Encode `text` per the input mode and write it to the device.
    ///
    /// A no-op returning `Ok` when the session is not running. In Hex mode
    /// all space characters are stripped before decoding; a decode failure is
    /// returned and nothing is written.
    pub fn write_encoded(&mut self, text: &str) -> Result<(), SessionError> {
        if !self.is_running() {
            return Ok(());
        }
        let data = match self.input_mode {
            PortMode::Hex => hex::decode(text.replace(' ', ""))?,
            PortMode::Raw => text.as_bytes().to_vec(),
        };
        let port = match self.port.as_mut() {
            Some(port) => port,
            None => return Ok(()),
        };
        let mut written = 0;
        while written < data.len() {
            written += port.write_bytes(&data[written..])?;
        }
        debug!(bytes = data.len(), "wrote to device");
        Ok(())
    }

    /// Stop the read loop and release the device handle.
    ///
    /// Idempotent: closing an already-closed session is a no-op `Ok`.
    pub fn close(&mut self) -> Result<(), PortError> {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.reader.take() {
            // The reader notices the flag within one read timeout.
            let _ = handle.join();
        }
        if let Some(port) = self.port.take() {
            info!(port = port.name(), "serial port closed");
        }
        Ok(())
    }
}

impl Drop for SerialSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl std::fmt::Debug for SerialSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialSession")
            .field("port", &self.port.as_ref().map(|p| p.name().to_string()))
            .field("display_mode", &self.display_mode)
            .field("input_mode", &self.input_mode)
            .field("running", &self.is_running())
            .finish()
    }
}
