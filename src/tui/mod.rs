//! Terminal user interface.
//!
//! A ratatui-based front end over the core: a settings panel with an option
//! picker, a connect/disconnect switch, the received-data display, and the
//! input line. Focus cycles through the four panels; a modal overlay
//! (picker or error dialog) captures all input while open.

mod app;
mod event;
mod focus;
mod modal;
mod theme;
mod ui;

pub use app::{App, AppState};
pub use event::{Event, EventHandler};
pub use focus::{FocusRing, Panel};
pub use modal::{Modal, ModalController, ModalError};
pub use theme::{Theme, THEMES};
pub use ui::render;
