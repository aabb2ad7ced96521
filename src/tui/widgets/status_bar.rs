/// StatusBar widget - displays status information and keyboard hints at the bottom of the screen
///
/// This widget renders a two-line status bar with:
/// - Top line: horizontal separator
/// - Bottom line: status message (or error) on the left, key hints on the right
///
/// Error messages are displayed with the error color.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::ThemeConfig;
use crate::tui::widgets::RenderableWidget;

const SEPARATOR: &str = "─";

/// Represents the style of a key hint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyHintStyle {
    /// Normal hint (default styling)
    Normal,
    /// Important hint (highlighted)
    Important,
    /// Subtle hint (dimmed)
    Subtle,
}

/// Represents a keyboard hint displayed in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyHint {
    /// The keyboard key (e.g., "?", "Esc", "Tab")
    pub key: String,
    /// The action description (e.g., "Help", "Close")
    pub action: String,
    /// The visual style for this hint
    pub style: KeyHintStyle,
}

impl KeyHint {
    /// Create a new normal key hint
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
            style: KeyHintStyle::Normal,
        }
    }

    /// Create a new key hint with a specific style
    pub fn with_style(key: impl Into<String>, action: impl Into<String>, style: KeyHintStyle) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
            style,
        }
    }

    fn width(&self) -> u16 {
        (self.key.width() + 1 + self.action.width()) as u16
    }
}

/// Widget for displaying status information and keyboard hints
#[derive(Debug, Default)]
pub struct StatusBar {
    /// Message shown on the left
    pub message: Option<String>,
    /// Whether the message is an error
    pub is_error: bool,
    /// List of keyboard hints to display
    pub hints: Vec<KeyHint>,
}

impl StatusBar {
    /// Create a new StatusBar with the default hints
    pub fn new() -> Self {
        Self {
            message: None,
            is_error: false,
            hints: vec![
                KeyHint::new("?", "Help"),
                KeyHint::new("Tab", "Switch"),
                KeyHint::with_style("q", "Quit", KeyHintStyle::Subtle),
            ],
        }
    }

    /// Set a status message (non-error)
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.message = Some(status.into());
        self.is_error = false;
        self
    }

    /// Set an error message
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.message = Some(error.into());
        self.is_error = true;
        self
    }

    /// Set custom keyboard hints
    pub fn with_hints(mut self, hints: Vec<KeyHint>) -> Self {
        self.hints = hints;
        self
    }

    /// Hints that fit in `width` columns, keeping the leftmost ones
    fn fitting_hints(&self, width: u16) -> (Vec<&KeyHint>, u16) {
        let mut used = 0u16;
        let mut fitting = Vec::new();
        for hint in &self.hints {
            let needed = hint.width() + if fitting.is_empty() { 0 } else { 2 };
            if used + needed > width {
                break;
            }
            used += needed;
            fitting.push(hint);
        }
        (fitting, used)
    }
}

impl RenderableWidget for StatusBar {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.width == 0 || area.height < 2 {
            return;
        }

        buf.set_string(
            area.x,
            area.y,
            SEPARATOR.repeat(area.width as usize),
            Style::default().fg(Color::DarkGray),
        );

        let y = area.y + 1;
        // Hints get at most half the line; the message keeps the rest
        let (hints, hints_width) = self.fitting_hints(area.width / 2);
        let mut x = area.right().saturating_sub(hints_width + 1);
        for (i, hint) in hints.iter().enumerate() {
            if i > 0 {
                x += 2;
            }
            let key_style = match hint.style {
                KeyHintStyle::Important => Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD),
                KeyHintStyle::Normal => Style::default().add_modifier(Modifier::BOLD),
                KeyHintStyle::Subtle => Style::default().fg(Color::DarkGray),
            };
            let action_style = match hint.style {
                KeyHintStyle::Subtle => Style::default().fg(Color::DarkGray),
                _ => Style::default(),
            };
            let (after_key, _) = buf.set_stringn(x, y, &hint.key, usize::MAX, key_style);
            let (after_action, _) = buf.set_stringn(after_key + 1, y, &hint.action, usize::MAX, action_style);
            x = after_action;
        }

        if let Some(message) = &self.message {
            let room = area.width.saturating_sub(hints_width + 3) as usize;
            let style = if self.is_error {
                Style::default().fg(theme.error_fg)
            } else {
                Style::default()
            };
            buf.set_stringn(area.x + 1, y, message, room, style);
        }
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(2) // Separator line + status line
    }

    fn preferred_width(&self) -> Option<u16> {
        None // Adapts to available width
    }
}
