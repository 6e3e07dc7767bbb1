//! Event plumbing for the TUI.
//!
//! A dedicated thread polls crossterm for input and emits periodic ticks;
//! the serial read loop pushes received data through the same channel via a
//! cloned sender. The main loop is the only consumer, so every state
//! mutation happens on one thread.

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, MouseEvent};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

/// Everything the main loop reacts to.
#[derive(Debug, Clone)]
pub enum Event {
    /// Periodic tick for UI refresh and liveness checks.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Mouse input.
    Mouse(MouseEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// Bytes from the serial read loop, already decoded for display.
    SerialRx(Vec<u8>),
}

/// Event handler that polls for terminal events.
pub struct EventHandler {
    sender: mpsc::Sender<Event>,
    receiver: mpsc::Receiver<Event>,
    #[allow(dead_code)]
    handler: thread::JoinHandle<()>,
}

impl EventHandler {
    /// Create a new event handler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handler_sender = sender.clone();

        let handler = thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                let timeout = tick_rate
                    .checked_sub(last_tick.elapsed())
                    .unwrap_or(Duration::ZERO);

                if event::poll(timeout).unwrap_or(false) {
                    let forwarded = match event::read() {
                        Ok(CrosstermEvent::Key(key)) => handler_sender.send(Event::Key(key)),
                        Ok(CrosstermEvent::Mouse(mouse)) => {
                            handler_sender.send(Event::Mouse(mouse))
                        }
                        Ok(CrosstermEvent::Resize(w, h)) => {
                            handler_sender.send(Event::Resize(w, h))
                        }
                        _ => Ok(()),
                    };
                    if forwarded.is_err() {
                        break;
                    }
                }

                if last_tick.elapsed() >= tick_rate {
                    if handler_sender.send(Event::Tick).is_err() {
                        break;
                    }
                    last_tick = Instant::now();
                }
            }
        });

        Self {
            sender,
            receiver,
            handler,
        }
    }

    /// Get the next event, blocking until one is available.
    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Get a sender for pushing custom events (the serial RX sink uses this).
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.sender.clone()
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(Duration::from_millis(33))
    }
}
