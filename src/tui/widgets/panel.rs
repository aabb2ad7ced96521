/// Popup panel - bordered box drawn over the grid
///
/// The panel clears what is beneath it, then draws a titled border, its text
/// lines and a hint line along the bottom edge.
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Widget},
};

use crate::config::ThemeConfig;
use crate::tui::widgets::{KeyHint, RenderableWidget};

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Normal,
    Heading,
    Dim,
    Error,
}

#[derive(Debug, Clone)]
pub struct PanelWidget {
    pub title: String,
    pub lines: Vec<(String, LineKind)>,
    pub hints: Vec<KeyHint>,
}

impl PanelWidget {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
            hints: Vec::new(),
        }
    }

    pub fn line(mut self, text: impl Into<String>) -> Self {
        self.lines.push((text.into(), LineKind::Normal));
        self
    }

    pub fn styled(mut self, text: impl Into<String>, kind: LineKind) -> Self {
        self.lines.push((text.into(), kind));
        self
    }

    pub fn hint(mut self, key: &str, action: &str) -> Self {
        self.hints.push(KeyHint::new(key, action));
        self
    }

    fn hint_text(&self) -> String {
        self.hints
            .iter()
            .map(|h| format!("{} {}", h.key, h.action))
            .collect::<Vec<_>>()
            .join("  ")
    }
}

impl RenderableWidget for PanelWidget {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.width < 4 || area.height < 3 {
            return;
        }
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(theme.selection_fg));
        let inner = block.inner(area);
        block.render(area, buf);

        let text_width = inner.width.saturating_sub(2) as usize;
        for (i, (text, kind)) in self.lines.iter().enumerate().take(inner.height as usize) {
            let style = match kind {
                LineKind::Normal => Style::default(),
                LineKind::Heading => Style::default().add_modifier(Modifier::BOLD),
                LineKind::Dim => Style::default().add_modifier(Modifier::DIM),
                LineKind::Error => Style::default().fg(theme.error_fg),
            };
            buf.set_stringn(inner.x + 1, inner.y + i as u16, text, text_width, style);
        }

        let hints = self.hint_text();
        if !hints.is_empty() {
            buf.set_stringn(
                area.x + 2,
                area.bottom() - 1,
                format!(" {} ", hints),
                area.width.saturating_sub(4) as usize,
                Style::default().fg(theme.selection_fg),
            );
        }
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(self.lines.len() as u16 + 2)
    }

    fn preferred_width(&self) -> Option<u16> {
        let longest = self
            .lines
            .iter()
            .map(|(text, _)| text.chars().count())
            .chain([self.title.chars().count() + 2, self.hint_text().chars().count() + 2])
            .max()
            .unwrap_or(0);
        Some(longest as u16 + 4)
    }
}
