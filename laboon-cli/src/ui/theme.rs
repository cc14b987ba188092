//! UI Theme Module - colour palette and style helpers
//!
//! Palette tokens instead of hard-coded colours, plus helpers that map row
//! tones and status kinds onto styles.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use laboon_core::controller::StatusKind;
use laboon_core::list::Tone;

/// Color palette tokens for the theme
#[derive(Clone, Debug)]
pub struct Palette {
    /// Title bar background
    pub title_bg: Color,
    /// Title bar foreground
    pub title_fg: Color,
    /// Primary text color
    pub text: Color,
    /// Dimmed text (descriptions, help)
    pub text_dim: Color,
    /// Muted text (exited containers)
    pub text_muted: Color,
    /// Accent color (focus bar, selection marker)
    pub accent: Color,
    /// Running containers
    pub success: Color,
    /// Paused or unknown containers
    pub warn: Color,
    /// Failed operations
    pub error: Color,
    /// Key hint text
    pub key_hint: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self::docker()
    }
}

impl Palette {
    /// Docker-blue dark theme
    pub fn docker() -> Self {
        Self {
            title_bg: Color::Rgb(47, 153, 238), // Docker blue
            title_fg: Color::Rgb(255, 253, 245),
            text: Color::Rgb(212, 212, 212),
            text_dim: Color::Rgb(150, 150, 150),
            text_muted: Color::Rgb(119, 119, 119),
            accent: Color::Rgb(47, 153, 238),
            success: Color::Rgb(158, 206, 106), // Green
            warn: Color::Rgb(224, 175, 104),    // Amber
            error: Color::Rgb(244, 135, 113),   // Coral red
            key_hint: Color::Rgb(206, 145, 120),
        }
    }

    /// High contrast theme variant
    pub fn high_contrast() -> Self {
        Self {
            title_bg: Color::Blue,
            title_fg: Color::White,
            text: Color::White,
            text_dim: Color::Rgb(200, 200, 200),
            text_muted: Color::Rgb(150, 150, 150),
            accent: Color::Cyan,
            success: Color::Green,
            warn: Color::Yellow,
            error: Color::Red,
            key_hint: Color::Yellow,
        }
    }
}

/// Theme configuration
#[derive(Clone, Debug, Default)]
pub struct Theme {
    pub palette: Palette,
}

impl Theme {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    // ========== StyleKit Helper Functions ==========

    /// Style for a row title, by tone
    pub fn tone_style(&self, tone: Tone) -> Style {
        let color = match tone {
            Tone::Success => self.palette.success,
            Tone::Muted => self.palette.text_muted,
            Tone::Warn => self.palette.warn,
        };
        Style::default().fg(color)
    }

    /// Style for the title bar ("Docker Containers")
    pub fn title_bar_style(&self) -> Style {
        Style::default()
            .fg(self.palette.title_fg)
            .bg(self.palette.title_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the selection marker
    pub fn marker_style(&self) -> Style {
        Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for the focused row's left bar
    pub fn focus_bar_style(&self) -> Style {
        Style::default().fg(self.palette.accent)
    }

    /// Style for the focused row's title
    pub fn focused_title_style(&self) -> Style {
        Style::default().add_modifier(Modifier::BOLD)
    }

    pub fn status_style(&self, kind: StatusKind) -> Style {
        match kind {
            StatusKind::Info => Style::default().fg(self.palette.success),
            StatusKind::Error => Style::default().fg(self.palette.error),
        }
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.palette.error)
    }

    pub fn key_hint_style(&self) -> Style {
        Style::default().fg(self.palette.key_hint)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.palette.text)
    }

    pub fn text_dim_style(&self) -> Style {
        Style::default().fg(self.palette.text_dim)
    }
}

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme for this process; later calls are ignored
pub fn init(palette: Palette) {
    let _ = THEME.set(Theme::new(palette));
}

/// Get the installed theme, falling back to the default palette
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

/// Convenience re-exports for common use cases
pub mod styles {
    use super::*;

    pub fn tone(tone: Tone) -> Style {
        theme().tone_style(tone)
    }

    pub fn title_bar() -> Style {
        theme().title_bar_style()
    }

    pub fn marker() -> Style {
        theme().marker_style()
    }

    pub fn focus_bar() -> Style {
        theme().focus_bar_style()
    }

    pub fn focused_title() -> Style {
        theme().focused_title_style()
    }

    pub fn status(kind: StatusKind) -> Style {
        theme().status_style(kind)
    }

    pub fn error() -> Style {
        theme().error_style()
    }

    pub fn key_hint() -> Style {
        theme().key_hint_style()
    }

    pub fn text() -> Style {
        theme().text_style()
    }

    pub fn text_dim() -> Style {
        theme().text_dim_style()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tone_colors_follow_palette() {
        let theme = Theme::new(Palette::docker());
        assert_eq!(theme.tone_style(Tone::Success).fg, Some(theme.palette.success));
        assert_eq!(theme.tone_style(Tone::Muted).fg, Some(theme.palette.text_muted));
        assert_eq!(theme.tone_style(Tone::Warn).fg, Some(theme.palette.warn));
    }

    #[test]
    fn test_status_kinds_differ() {
        let theme = Theme::new(Palette::high_contrast());
        assert_ne!(
            theme.status_style(StatusKind::Info),
            theme.status_style(StatusKind::Error)
        );
    }
}
