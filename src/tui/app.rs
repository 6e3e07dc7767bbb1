//! TUI application state and main loop.
//!
//! The `App` owns the settings registry, the optional serial session, the
//! focus ring, and the modal controller.
//! All of it is mutated from the single event-loop thread; the serial read
//! loop only ever pushes `Event::SerialRx` through the channel.

use crate::config::Config;
use crate::session::{PortMode, SerialSession, SessionError};
use crate::settings::SettingsRegistry;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::collections::VecDeque;
use std::io;
use std::sync::mpsc;
use tracing::{info, warn};

use super::event::{Event, EventHandler};
use super::focus::{FocusRing, Panel};
use super::modal::ModalController;
use super::theme::Theme;
use super::ui;

/// Application state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Application is running
    Running,
    /// Application should quit
    Quitting,
}

/// Main TUI application.
pub struct App {
    /// Current app state
    pub state: AppState,
    /// Current theme
    pub theme: Theme,
    /// Configuration
    pub config: Config,

    /// Session settings in presentation order
    pub registry: SettingsRegistry,
    /// Panel focus ring
    pub focus: FocusRing,
    /// Transient overlay state
    pub modal: ModalController,
    /// The open connection, if any
    session: Option<SerialSession>,

    /// Cursor position in the settings panel
    pub selected_setting: usize,

    /// Received-data scrollback, newest last
    pub display: VecDeque<String>,
    /// Scroll offset in lines from the bottom
    pub scroll_offset: usize,

    /// Current input line
    pub input: String,
    /// Cursor position in the input line
    pub input_cursor: usize,

    /// One-line status note shown in the footer
    pub status: Option<String>,

    /// Sender the serial read loop delivers into; set once the event
    /// handler exists.
    serial_tx: Option<mpsc::Sender<Event>>,
}

impl App {
    /// Create a new application around a prepared registry.
    pub fn new(config: Config, registry: SettingsRegistry) -> Self {
        let theme = Theme::by_name(&config.tui.theme)
            .cloned()
            .unwrap_or_default();

        Self {
            state: AppState::Running,
            theme,
            config,
            registry,
            focus: FocusRing::new(),
            modal: ModalController::new(),
            session: None,
            selected_setting: 0,
            display: VecDeque::new(),
            scroll_offset: 0,
            input: String::new(),
            input_cursor: 0,
            status: None,
            serial_tx: None,
        }
    }

    /// Run the application main loop.
    pub fn run(&mut self) -> io::Result<()> {
        let mut terminal = ui::setup_terminal()?;

        let events = EventHandler::new(self.config.tui.tick_interval());
        self.serial_tx = Some(events.sender());

        while self.state == AppState::Running {
            terminal.draw(|frame| ui::render(self, frame))?;

            match events.next() {
                Ok(Event::Tick) => self.on_tick(),
                Ok(Event::Key(key)) => self.handle_key(key),
                Ok(Event::SerialRx(bytes)) => self.append_rx(&bytes),
                Ok(Event::Mouse(_)) | Ok(Event::Resize(_, _)) => {}
                Err(_) => self.state = AppState::Quitting,
            }
        }

        if let Some(mut session) = self.session.take() {
            let _ = session.close();
        }

        ui::restore_terminal(terminal)
    }

    /// Whether a session exists and is still alive.
    pub fn session_active(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.is_running())
    }

    /// Periodic housekeeping: notice a session whose read loop died.
    fn on_tick(&mut self) {
        if let Some(session) = &self.session {
            if !session.is_running() {
                warn!("session died outside of close; dropping it");
                self.session = None;
                self.status = Some("device disconnected".to_string());
            }
        }
    }

    /// Keyboard dispatch. The modal, when open, captures everything.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.state = AppState::Quitting;
            return;
        }

        if self.modal.is_open() {
            self.handle_modal_key(key);
            return;
        }

        if key.code == KeyCode::Tab {
            self.focus.advance();
            return;
        }

        match self.focus.active() {
            Panel::Settings => self.handle_settings_key(key),
            Panel::Switch => {
                if key.code == KeyCode::Enter {
                    self.toggle_connection();
                }
            }
            Panel::Display => self.handle_display_key(key),
            Panel::Input => self.handle_input_key(key),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.modal.move_selection(-1),
            KeyCode::Down => self.modal.move_selection(1),
            KeyCode::Enter => match self.modal.selection() {
                Some(index) => self.confirm_picker(index),
                // An error dialog: acknowledge and restore focus.
                None => self.dismiss_modal(),
            },
            KeyCode::Esc => self.dismiss_modal(),
            _ => {}
        }
    }

    fn confirm_picker(&mut self, index: usize) {
        match self.modal.confirm(index, &mut self.registry) {
            Ok(panel) => self.focus.set_active(panel),
            Err(e) => {
                let focus = self.focus.active();
                self.modal.show_error(e.to_string(), focus);
            }
        }
    }

    fn dismiss_modal(&mut self) {
        if let Some(panel) = self.modal.dismiss() {
            self.focus.set_active(panel);
        }
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => {
                self.selected_setting = self.selected_setting.saturating_sub(1);
            }
            KeyCode::Down => {
                let last = self.registry.len().saturating_sub(1);
                self.selected_setting = (self.selected_setting + 1).min(last);
            }
            KeyCode::Enter => self.activate_selected_setting(),
            _ => {}
        }
    }

    /// Open the option picker for the highlighted setting.
    fn activate_selected_setting(&mut self) {
        let session_active = self.session_active();
        let return_focus = self.focus.active();
        let result = self.modal.open_picker(
            self.registry.get_at(self.selected_setting),
            session_active,
            return_focus,
        );
        if let Err(e) = result {
            self.modal.show_error(e.to_string(), return_focus);
        }
    }

    fn handle_display_key(&mut self, key: KeyEvent) {
        let max = self.display.len().saturating_sub(1);
        match key.code {
            KeyCode::Up => self.scroll_offset = (self.scroll_offset + 1).min(max),
            KeyCode::Down => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::PageUp => self.scroll_offset = (self.scroll_offset + 10).min(max),
            KeyCode::PageDown => self.scroll_offset = self.scroll_offset.saturating_sub(10),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Backspace => {
                if self.input_cursor > 0 {
                    self.input_cursor -= 1;
                    self.input.remove(self.input_cursor);
                }
            }
            KeyCode::Delete => {
                if self.input_cursor < self.input.len() {
                    self.input.remove(self.input_cursor);
                }
            }
            KeyCode::Left => self.input_cursor = self.input_cursor.saturating_sub(1),
            KeyCode::Right => self.input_cursor = (self.input_cursor + 1).min(self.input.len()),
            KeyCode::Home => self.input_cursor = 0,
            KeyCode::End => self.input_cursor = self.input.len(),
            KeyCode::Char(c) => {
                self.input.insert(self.input_cursor, c);
                self.input_cursor += 1;
            }
            _ => {}
        }
    }

    /// Open or close the connection, from the registry's current values.
    pub fn toggle_connection(&mut self) {
        if self.session_active() {
            if let Some(mut session) = self.session.take() {
                let _ = session.close();
            }
            self.status = Some("stopped".to_string());
            return;
        }

        // A dead session may still be lying around; it is already closed.
        self.session = None;

        let config = self.registry.serial_config();
        let display_mode = self.registry.display_mode();
        let input_mode = self.registry.input_mode();

        match SerialSession::open(&config, display_mode, input_mode) {
            Err(e) => {
                let focus = self.focus.active();
                self.modal.show_error(e.to_string(), focus);
            }
            Ok(mut session) => {
                if let Err(e) = self.spawn_reader(&mut session) {
                    let focus = self.focus.active();
                    self.modal.show_error(e.to_string(), focus);
                    return;
                }
                info!(port = %config.port, "session started");
                self.status = Some(format!("connected to {}", config.port));
                self.session = Some(session);
            }
        }
    }

    fn spawn_reader(&self, session: &mut SerialSession) -> Result<(), SessionError> {
        let Some(tx) = self.serial_tx.clone() else {
            return Ok(());
        };
        session.start_reading(move |bytes| {
            let _ = tx.send(Event::SerialRx(bytes));
        })
    }

    /// Write the input line(s) to the device and clear the input either way.
    pub fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.input);
        self.input_cursor = 0;

        if !self.session_active() {
            let focus = self.focus.active();
            self.modal.show_error("not running", focus);
            return;
        }

        let focus = self.focus.active();
        if let Some(session) = self.session.as_mut() {
            for line in text.split('\n') {
                if let Err(e) = session.write_encoded(line) {
                    self.modal.show_error(e.to_string(), focus);
                    break;
                }
            }
        }
    }

    /// Append received (already decoded) bytes to the scrollback.
    pub fn append_rx(&mut self, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes).replace("\r\n", "\n");

        if self.display.is_empty() {
            self.display.push_back(String::new());
        }
        let mut parts = text.split('\n');
        if let (Some(first), Some(last)) = (parts.next(), self.display.back_mut()) {
            last.push_str(first);
        }
        for part in parts {
            self.display.push_back(part.to_string());
        }

        while self.display.len() > self.config.tui.scrollback_lines {
            self.display.pop_front();
        }
    }

    /// Mode tag for the display panel title.
    pub fn display_mode_tag(&self) -> PortMode {
        self.registry.display_mode()
    }

    /// Mode tag for the input panel title.
    pub fn input_mode_tag(&self) -> PortMode {
        self.registry.input_mode()
    }

    #[cfg(test)]
    pub(crate) fn install_session(&mut self, session: SerialSession) {
        self.session = Some(session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::MockSerialPort;
    use crate::settings::keys;
    use crate::tui::modal::Modal;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app() -> App {
        App::new(Config::default(), SettingsRegistry::with_defaults())
    }

    fn mock_session(app: &mut App) -> MockSerialPort {
        let mock = MockSerialPort::new("MOCK0");
        let session =
            SerialSession::from_adapter(Box::new(mock.clone()), PortMode::Raw, PortMode::Raw);
        app.install_session(session);
        mock
    }

    #[test]
    fn tab_cycles_focus_through_all_panels() {
        let mut app = app();
        assert_eq!(app.focus.active(), Panel::Settings);
        for _ in 0..4 {
            app.handle_key(key(KeyCode::Tab));
        }
        assert_eq!(app.focus.active(), Panel::Settings);
    }

    #[test]
    fn picker_flow_applies_a_candidate() {
        let mut app = app();
        // Highlight the baud rate setting and activate it.
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));
        assert!(app.modal.is_open());

        // Cursor starts on the current value (9600); pick 19200.
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.modal.is_open());
        assert_eq!(app.registry.get(keys::BAUD_RATE).text(), "19200");
        assert_eq!(app.focus.active(), Panel::Settings);
    }

    #[test]
    fn picker_refused_while_connected() {
        let mut app = app();
        mock_session(&mut app);

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Enter));

        match app.modal.current() {
            Some(Modal::ErrorDialog { message, .. }) => {
                assert_eq!(message, "stop the session before changing settings");
            }
            other => panic!("expected error dialog, got {:?}", other),
        }
        // Acknowledging restores the settings panel.
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.modal.is_open());
        assert_eq!(app.focus.active(), Panel::Settings);
    }

    #[test]
    fn submit_without_session_shows_error_and_discards_input() {
        let mut app = app();
        app.focus.set_active(Panel::Input);
        for c in "hello".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert!(app.input.is_empty());
        assert!(matches!(
            app.modal.current(),
            Some(Modal::ErrorDialog { .. })
        ));
    }

    #[test]
    fn submit_writes_line_to_device_and_clears_input() {
        let mut app = app();
        let mock = mock_session(&mut app);

        app.focus.set_active(Panel::Input);
        for c in "AT".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));

        assert_eq!(mock.written_bytes(), b"AT");
        assert!(app.input.is_empty());
        assert!(!app.modal.is_open());
    }

    #[test]
    fn write_failure_surfaces_in_error_dialog() {
        let mut app = app();
        let mock = mock_session(&mut app);
        mock.fail_writes(std::io::ErrorKind::BrokenPipe);

        app.focus.set_active(Panel::Input);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Enter));

        assert!(matches!(
            app.modal.current(),
            Some(Modal::ErrorDialog { .. })
        ));
        assert!(app.input.is_empty());
    }

    #[test]
    fn toggle_closes_a_running_session() {
        let mut app = app();
        mock_session(&mut app);
        assert!(app.session_active());

        app.focus.set_active(Panel::Switch);
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.session_active());
    }

    #[test]
    fn failed_open_leaves_state_unchanged_and_reports() {
        let mut app = app();
        // No port selected; the OS open fails and nothing is created.
        app.focus.set_active(Panel::Switch);
        app.handle_key(key(KeyCode::Enter));

        assert!(!app.session_active());
        assert!(matches!(
            app.modal.current(),
            Some(Modal::ErrorDialog { .. })
        ));
    }

    #[test]
    fn dead_session_is_dropped_on_tick() {
        let mut app = app();
        let mock = MockSerialPort::new("MOCK0");
        let mut session =
            SerialSession::from_adapter(Box::new(mock), PortMode::Raw, PortMode::Raw);
        session.close().unwrap();
        app.install_session(session);

        app.on_tick();
        assert!(!app.session_active());
        assert_eq!(app.status.as_deref(), Some("device disconnected"));
    }

    #[test]
    fn rx_bytes_are_normalized_into_scrollback_lines() {
        let mut app = app();
        app.append_rx(b"one\r\ntwo\r\nthr");
        app.append_rx(b"ee\n");

        let lines: Vec<&str> = app.display.iter().map(|s| s.as_str()).collect();
        assert_eq!(lines, vec!["one", "two", "three", ""]);
    }

    #[test]
    fn scrollback_is_bounded() {
        let mut app = app();
        app.config.tui.scrollback_lines = 10;
        for i in 0..50 {
            app.append_rx(format!("line {i}\n").as_bytes());
        }
        assert!(app.display.len() <= 10);
    }

    #[test]
    fn ctrl_c_quits_even_with_modal_open() {
        let mut app = app();
        app.modal.show_error("boom", Panel::Settings);
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert_eq!(app.state, AppState::Quitting);
    }
}
