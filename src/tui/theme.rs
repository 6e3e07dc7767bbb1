//! Theme definitions for the TUI.

use ratatui::style::Color;

/// A color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Theme name
    pub name: &'static str,

    /// Foreground (text) color
    pub fg: Color,
    /// Border color
    pub border: Color,
    /// Border/title color of the focused panel
    pub accent: Color,
    /// Selection/highlight background
    pub selection: Color,
    /// Inactive element color
    pub inactive: Color,
    /// Error messages and the stopped switch
    pub error: Color,
    /// Success messages and the running switch
    pub ok: Color,
}

impl Theme {
    /// Dark theme (default)
    pub const fn dark() -> Self {
        Self {
            name: "dark",
            fg: Color::Rgb(205, 214, 244),
            border: Color::Rgb(88, 91, 112),
            accent: Color::Rgb(166, 227, 161),
            selection: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(108, 112, 134),
            error: Color::Rgb(243, 139, 168),
            ok: Color::Rgb(166, 227, 161),
        }
    }

    /// Light theme
    pub const fn light() -> Self {
        Self {
            name: "light",
            fg: Color::Rgb(76, 79, 105),
            border: Color::Rgb(172, 176, 190),
            accent: Color::Rgb(64, 160, 43),
            selection: Color::Rgb(204, 208, 218),
            inactive: Color::Rgb(140, 143, 161),
            error: Color::Rgb(210, 15, 57),
            ok: Color::Rgb(64, 160, 43),
        }
    }

    /// Nord theme
    pub const fn nord() -> Self {
        Self {
            name: "nord",
            fg: Color::Rgb(216, 222, 233),
            border: Color::Rgb(76, 86, 106),
            accent: Color::Rgb(163, 190, 140),
            selection: Color::Rgb(67, 76, 94),
            inactive: Color::Rgb(107, 112, 137),
            error: Color::Rgb(191, 97, 106),
            ok: Color::Rgb(163, 190, 140),
        }
    }

    /// Get theme by name
    pub fn by_name(name: &str) -> Option<&'static Theme> {
        THEMES.iter().find(|t| t.name == name)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Available themes
pub static THEMES: &[Theme] = &[Theme::dark(), Theme::light(), Theme::nord()];
