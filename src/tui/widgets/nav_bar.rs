/// NavBar widget - month navigation cell plus the horizontal scrollbar
///
/// Renders one line: `◀ label ▶` over the employee column, then the track
/// with its thumb over the day strip. Arrows are dimmed when there is
/// nothing to scroll to on that side.
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::ThemeConfig;
use crate::tui::layout::{thumb_span, ARROW_WIDTH};
use crate::tui::widgets::RenderableWidget;

const TRACK: &str = "░";
const THUMB: &str = "█";

#[derive(Debug, Clone)]
pub struct NavBar {
    pub label: String,
    pub can_previous: bool,
    pub can_next: bool,
    pub thumb_width_percent: u16,
    pub thumb_position_percent: u16,
    /// Width of the navigation cell (the employee column)
    pub nav_width: u16,
}

impl RenderableWidget for NavBar {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let nav_width = self.nav_width.min(area.width / 2);
        let [nav, track] = Layout::horizontal([Constraint::Length(nav_width), Constraint::Min(0)]).areas(area);

        let arrow = |enabled: bool| {
            if enabled {
                Style::default().fg(theme.selection_fg)
            } else {
                Style::default().fg(Color::DarkGray)
            }
        };
        if nav.width >= ARROW_WIDTH * 2 {
            buf.set_string(nav.x, nav.y, "◀", arrow(self.can_previous));
            buf.set_string(nav.right() - 1, nav.y, "▶", arrow(self.can_next));
            let inner = nav.width - ARROW_WIDTH * 2;
            let label_width = self.label.width() as u16;
            let pad = inner.saturating_sub(label_width) / 2;
            buf.set_stringn(nav.x + ARROW_WIDTH + pad, nav.y, &self.label, inner as usize, Style::default());
        }

        let (start, len) = thumb_span(track.width, self.thumb_width_percent, self.thumb_position_percent);
        for column in 0..track.width {
            let (symbol, style) = if column >= start && column < start + len {
                (THUMB, Style::default().fg(theme.selection_fg))
            } else {
                (TRACK, Style::default().fg(Color::DarkGray))
            };
            buf.set_string(track.x + column, track.y, symbol, style);
        }
    }

    fn preferred_height(&self) -> Option<u16> {
        Some(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::testing::*;

    fn bar() -> NavBar {
        NavBar {
            label: "May".to_string(),
            can_previous: false,
            can_next: true,
            thumb_width_percent: 25,
            thumb_position_percent: 50,
            nav_width: 10,
        }
    }

    #[test]
    fn test_nav_cell_and_track() {
        let buf = render_widget(&bar(), 30, 1);
        assert_buffer_line(&buf, 0, "◀  May   ▶░░░░░░░░░░█████░░░░░");
    }

    #[test]
    fn test_disabled_arrow_is_dimmed() {
        let theme = test_theme();
        let buf = render_widget(&bar(), 30, 1);
        assert_eq!(buf[(0, 0)].fg, Color::DarkGray);
        assert_eq!(buf[(9, 0)].fg, theme.selection_fg);
    }

    #[test]
    fn test_full_width_thumb() {
        let widget = NavBar {
            thumb_width_percent: 100,
            thumb_position_percent: 0,
            ..bar()
        };
        let buf = render_widget(&widget, 30, 1);
        assert!(buffer_line(&buf, 0).ends_with(&THUMB.repeat(20)));
    }
}
