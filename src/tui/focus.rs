//! Panel focus cycling.

/// The four fixed panels, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Settings list.
    Settings,
    /// Connect/disconnect switch.
    Switch,
    /// Received data display.
    Display,
    /// Outgoing input line.
    Input,
}

/// Cycles focus through the fixed panel ring.
///
/// The ring is established once at startup; a modal overlay never joins it.
/// While a modal is open, key routing goes to the modal first, so `advance`
/// cannot be reached with a transient view focused.
#[derive(Debug)]
pub struct FocusRing {
    panels: [Panel; 4],
    active: usize,
}

impl FocusRing {
    pub fn new() -> Self {
        Self {
            panels: [Panel::Settings, Panel::Switch, Panel::Display, Panel::Input],
            active: 0,
        }
    }

    /// The currently focused panel.
    pub fn active(&self) -> Panel {
        self.panels[self.active]
    }

    /// Move focus to the next panel in the ring.
    pub fn advance(&mut self) {
        self.active = (self.active + 1) % self.panels.len();
    }

    /// Restore focus to a specific panel (e.g. after a modal closes).
    pub fn set_active(&mut self, panel: Panel) {
        if let Some(idx) = self.panels.iter().position(|p| *p == panel) {
            self.active = idx;
        }
    }

    /// Whether the focused panel shows a visible text cursor.
    ///
    /// Only the display and input panels do.
    pub fn allows_text_cursor(&self) -> bool {
        matches!(self.active(), Panel::Display | Panel::Input)
    }
}

impl Default for FocusRing {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_advances_return_to_start() {
        let mut focus = FocusRing::new();
        assert_eq!(focus.active(), Panel::Settings);

        for _ in 0..4 {
            focus.advance();
        }
        assert_eq!(focus.active(), Panel::Settings);
    }

    #[test]
    fn ring_order_is_fixed() {
        let mut focus = FocusRing::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            seen.push(focus.active());
            focus.advance();
        }
        assert_eq!(
            seen,
            vec![Panel::Settings, Panel::Switch, Panel::Display, Panel::Input]
        );
    }

    #[test]
    fn text_cursor_only_on_display_and_input() {
        let mut focus = FocusRing::new();
        assert!(!focus.allows_text_cursor()); // Settings
        focus.advance();
        assert!(!focus.allows_text_cursor()); // Switch
        focus.advance();
        assert!(focus.allows_text_cursor()); // Display
        focus.advance();
        assert!(focus.allows_text_cursor()); // Input
    }

    #[test]
    fn set_active_restores_a_panel() {
        let mut focus = FocusRing::new();
        focus.set_active(Panel::Input);
        assert_eq!(focus.active(), Panel::Input);
    }
}
