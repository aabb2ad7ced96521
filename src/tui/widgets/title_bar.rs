/// TitleBar widget - application name, screen tabs and activity indicators
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
};
use unicode_width::UnicodeWidthStr;

use crate::config::{AppMode, ThemeConfig};
use crate::tui::widgets::RenderableWidget;

pub const APP_NAME: &str = "HR Calendar";

const SCREENS: [(AppMode, &str); 2] = [(AppMode::Leave, "Leave"), (AppMode::Cra, "Activity")];

#[derive(Debug, Clone)]
pub struct TitleBar {
    pub mode: AppMode,
    /// Active filter, already formatted
    pub filter: Option<String>,
    pub loading: bool,
    pub selected: usize,
}

impl TitleBar {
    /// Right-aligned indicators, e.g. "3 selected  Loading…"
    fn indicators(&self) -> String {
        let mut parts = Vec::new();
        if self.selected > 0 {
            parts.push(format!("{} selected", self.selected));
        }
        if self.loading {
            parts.push("Loading…".to_string());
        }
        parts.join("  ")
    }
}

impl RenderableWidget for TitleBar {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let right = area.right();
        let mut x = area.x + 1;
        let mut put = |x: &mut u16, text: &str, style: Style| {
            if *x >= right {
                return;
            }
            let (next, _) = buf.set_stringn(*x, area.y, text, (right - *x) as usize, style);
            *x = next;
        };

        put(&mut x, APP_NAME, Style::default().add_modifier(Modifier::BOLD));
        put(&mut x, "  ", Style::default());
        for (mode, label) in SCREENS {
            let style = if mode == self.mode {
                Style::default()
                    .fg(theme.selection_fg)
                    .add_modifier(Modifier::BOLD | Modifier::REVERSED)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            put(&mut x, &format!(" {} ", label), style);
            put(&mut x, " ", Style::default());
        }
        if let Some(filter) = &self.filter {
            put(&mut x, &format!(" Filter: {}", filter), Style::default().fg(Color::Cyan));
        }

        let indicators = self.indicators();
        let width = indicators.width() as u16;
        if width > 0 && x + width + 1 < right {
            buf.set_string(right - width - 1, area.y, &indicators, Style::default().fg(theme.selection_fg));
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

    fn title(mode: AppMode) -> TitleBar {
        TitleBar {
            mode,
            filter: None,
            loading: false,
            selected: 0,
        }
    }

    #[test]
    fn test_tabs_highlight_active_screen() {
        let buf = render_widget(&title(AppMode::Cra), 40, 1);
        assert!(buffer_line(&buf, 0).starts_with(" HR Calendar   Leave   Activity "));
        // " Activity " starts after " HR Calendar  " + " Leave " + " "
        let activity_x = 1 + 11 + 2 + 7 + 1;
        assert!(buf[(activity_x, 0)].modifier.contains(Modifier::REVERSED));
        assert!(!buf[(14, 0)].modifier.contains(Modifier::REVERSED));
    }

    #[test]
    fn test_indicators_are_right_aligned() {
        let widget = TitleBar {
            loading: true,
            selected: 3,
            ..title(AppMode::Leave)
        };
        let buf = render_widget(&widget, 60, 1);
        assert!(buffer_line(&buf, 0).ends_with("3 selected  Loading… "));
    }

    #[test]
    fn test_filter_is_shown() {
        let widget = TitleBar {
            filter: Some("Engineering".to_string()),
            ..title(AppMode::Leave)
        };
        let buf = render_widget(&widget, 60, 1);
        assert!(buffer_line(&buf, 0).contains("Filter: Engineering"));
    }

    #[test]
    fn test_narrow_area_truncates() {
        let buf = render_widget(&title(AppMode::Leave), 8, 1);
        assert_buffer_line(&buf, 0, " HR Cale");
    }
}
