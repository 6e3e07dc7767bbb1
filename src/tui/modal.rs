//! Transient overlay state: the option picker and the error dialog.
//!
//! A modal suspends normal panel navigation. All key routing checks the
//! controller first; while a modal is open, input goes to it and nowhere
//! else. Every modal records the panel to restore when it closes.

use super::focus::Panel;
use crate::settings::{Setting, SettingsError, SettingsRegistry};
use thiserror::Error;
use tracing::debug;

/// Errors from modal operations.
#[derive(Debug, Error)]
pub enum ModalError {
    /// Settings must not change underneath a live connection.
    #[error("stop the session before changing settings")]
    SessionRunning,

    /// Confirm was called with no picker open.
    #[error("no option picker is open")]
    NoPickerOpen,

    /// Confirm was called with an index outside the recorded candidates.
    #[error("selection {index} out of range ({len} candidates)")]
    SelectionOutOfRange { index: usize, len: usize },

    /// The owning setting rejected the chosen value.
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// The overlay currently shown, if any.
#[derive(Debug)]
pub enum Modal {
    /// Candidate list for one setting.
    OptionPicker {
        /// Key of the setting being edited.
        setting_key: &'static str,
        /// Candidates recorded at open time; confirm indexes into these.
        candidates: Vec<String>,
        /// Picker cursor position.
        selected: usize,
        /// Panel to restore on close.
        return_focus: Panel,
    },
    /// A message awaiting acknowledgment.
    ErrorDialog {
        message: String,
        /// Panel to restore on close.
        return_focus: Panel,
    },
}

impl Modal {
    fn return_focus(&self) -> Panel {
        match self {
            Modal::OptionPicker { return_focus, .. } => *return_focus,
            Modal::ErrorDialog { return_focus, .. } => *return_focus,
        }
    }
}

/// Owns the optional overlay and its open/confirm/dismiss transitions.
#[derive(Debug, Default)]
pub struct ModalController {
    current: Option<Modal>,
}

impl ModalController {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// The open modal, for rendering.
    pub fn current(&self) -> Option<&Modal> {
        self.current.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Open the option picker for `setting`.
    ///
    /// Refused while a session is running, without touching the setting's
    /// candidate enumeration. A candidate list flagged non-presentable is a
    /// silent no-op. On success the cursor starts at the candidate equal to
    /// the setting's current value, or 0 when none matches.
    pub fn open_picker(
        &mut self,
        setting: &dyn Setting,
        session_active: bool,
        return_focus: Panel,
    ) -> Result<(), ModalError> {
        if session_active {
            return Err(ModalError::SessionRunning);
        }
        let candidates = setting.candidates()?;
        if !candidates.present {
            return Ok(());
        }

        let current = setting.text();
        let selected = candidates
            .items
            .iter()
            .position(|c| *c == current)
            .unwrap_or(0);

        debug!(key = setting.key(), n = candidates.items.len(), "picker opened");
        self.current = Some(Modal::OptionPicker {
            setting_key: setting.key(),
            candidates: candidates.items,
            selected,
            return_focus,
        });
        Ok(())
    }

    /// Move the picker cursor; clamped at the list edges.
    pub fn move_selection(&mut self, delta: isize) {
        if let Some(Modal::OptionPicker {
            candidates,
            selected,
            ..
        }) = self.current.as_mut()
        {
            let last = candidates.len().saturating_sub(1);
            let next = selected.saturating_add_signed(delta);
            *selected = next.min(last);
        }
    }

    /// The picker cursor position, if a picker is open.
    pub fn selection(&self) -> Option<usize> {
        match self.current.as_ref() {
            Some(Modal::OptionPicker { selected, .. }) => Some(*selected),
            _ => None,
        }
    }

    /// Apply the candidate at `index` to the owning setting and close.
    ///
    /// Fails if no picker is open or `index` is out of range of the
    /// candidates recorded at open time; in both cases nothing changes and
    /// the picker (if any) stays open. On success, returns the panel to
    /// restore focus to.
    pub fn confirm(
        &mut self,
        index: usize,
        registry: &mut SettingsRegistry,
    ) -> Result<Panel, ModalError> {
        let (setting_key, candidate, return_focus) = match self.current.as_ref() {
            Some(Modal::OptionPicker {
                setting_key,
                candidates,
                return_focus,
                ..
            }) => {
                let candidate = candidates.get(index).ok_or(
                    ModalError::SelectionOutOfRange {
                        index,
                        len: candidates.len(),
                    },
                )?;
                (*setting_key, candidate.clone(), *return_focus)
            }
            _ => return Err(ModalError::NoPickerOpen),
        };

        registry.get_mut(setting_key).set(&candidate)?;
        debug!(key = setting_key, value = %candidate, "setting applied");
        self.current = None;
        Ok(return_focus)
    }

    /// Show an error message, replacing any open modal.
    ///
    /// When a picker is replaced, the dialog inherits its return focus so
    /// dismissal restores the panel the operator actually came from.
    pub fn show_error(&mut self, message: impl Into<String>, current_focus: Panel) {
        let return_focus = self
            .current
            .take()
            .map(|m| m.return_focus())
            .unwrap_or(current_focus);
        self.current = Some(Modal::ErrorDialog {
            message: message.into(),
            return_focus,
        });
    }

    /// Close the modal without applying anything.
    ///
    /// Returns the panel to restore focus to, or `None` if nothing was open.
    pub fn dismiss(&mut self) -> Option<Panel> {
        self.current.take().map(|m| m.return_focus())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{keys, SettingValue, SettingsRegistry};

    fn registry() -> SettingsRegistry {
        SettingsRegistry::with_defaults()
    }

    #[test]
    fn picker_cursor_starts_at_current_value() {
        let reg = registry();
        let mut modal = ModalController::new();
        modal
            .open_picker(reg.get(keys::BAUD_RATE), false, Panel::Settings)
            .unwrap();
        // Default 9600 is the second candidate.
        assert_eq!(modal.selection(), Some(1));
    }

    #[test]
    fn picker_refused_while_session_running() {
        let reg = registry();
        let mut modal = ModalController::new();
        let err = modal
            .open_picker(reg.get(keys::BAUD_RATE), true, Panel::Settings)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "stop the session before changing settings"
        );
        assert!(!modal.is_open());
    }

    #[test]
    fn refusal_does_not_enumerate_candidates() {
        use crate::settings::PortSetting;

        let port = PortSetting::with_lister(|| panic!("trigger must not run"));
        let mut modal = ModalController::new();
        assert!(modal.open_picker(&port, true, Panel::Settings).is_err());
    }

    #[test]
    fn confirm_applies_candidate_and_restores_focus() {
        let mut reg = registry();
        let mut modal = ModalController::new();
        modal
            .open_picker(reg.get(keys::BAUD_RATE), false, Panel::Settings)
            .unwrap();

        let restored = modal.confirm(3, &mut reg).unwrap();
        assert_eq!(restored, Panel::Settings);
        assert!(!modal.is_open());
        assert_eq!(
            reg.get(keys::BAUD_RATE).value(),
            SettingValue::Baud(19200)
        );
    }

    #[test]
    fn confirm_out_of_range_leaves_picker_open_and_setting_untouched() {
        let mut reg = registry();
        let mut modal = ModalController::new();
        modal
            .open_picker(reg.get(keys::PARITY), false, Panel::Settings)
            .unwrap();

        let err = modal.confirm(99, &mut reg).unwrap_err();
        assert!(matches!(
            err,
            ModalError::SelectionOutOfRange { index: 99, len: 5 }
        ));
        assert!(modal.is_open());
        assert_eq!(reg.get(keys::PARITY).text(), "None");
    }

    #[test]
    fn confirm_without_picker_is_an_error() {
        let mut reg = registry();
        let mut modal = ModalController::new();
        assert!(matches!(
            modal.confirm(0, &mut reg),
            Err(ModalError::NoPickerOpen)
        ));

        modal.show_error("boom", Panel::Input);
        assert!(matches!(
            modal.confirm(0, &mut reg),
            Err(ModalError::NoPickerOpen)
        ));
    }

    #[test]
    fn selection_clamps_at_edges() {
        let reg = registry();
        let mut modal = ModalController::new();
        modal
            .open_picker(reg.get(keys::STOP_BITS), false, Panel::Settings)
            .unwrap();
        assert_eq!(modal.selection(), Some(0));

        modal.move_selection(-1);
        assert_eq!(modal.selection(), Some(0));

        modal.move_selection(1);
        modal.move_selection(1);
        modal.move_selection(1);
        assert_eq!(modal.selection(), Some(2));
    }

    #[test]
    fn error_dialog_inherits_picker_return_focus() {
        let reg = registry();
        let mut modal = ModalController::new();
        modal
            .open_picker(reg.get(keys::BAUD_RATE), false, Panel::Settings)
            .unwrap();

        modal.show_error("device went away", Panel::Display);
        assert_eq!(modal.dismiss(), Some(Panel::Settings));
    }

    #[test]
    fn dismiss_without_modal_is_none() {
        let mut modal = ModalController::new();
        assert_eq!(modal.dismiss(), None);
    }
}
