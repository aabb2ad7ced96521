/// Legend widget - one coloured swatch per status shown on the screen
use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use crate::calendar::{CellStatus, LeaveCategory};
use crate::config::{AppMode, ThemeConfig};
use crate::tui::widgets::RenderableWidget;

const SWATCH: &str = "■";

#[derive(Debug, Clone)]
pub struct Legend {
    pub entries: Vec<(&'static str, CellStatus)>,
}

impl Legend {
    pub fn for_mode(mode: AppMode) -> Self {
        let entries = match mode {
            AppMode::Leave => vec![
                ("Approved", CellStatus::Approved),
                ("RTT", CellStatus::Leave(LeaveCategory::Rtt)),
                ("Pending", CellStatus::Pending),
                ("Rejected", CellStatus::Rejected),
                ("Holiday", CellStatus::Holiday),
                ("Weekend", CellStatus::Weekend),
            ],
            AppMode::Cra => vec![
                ("Full day", CellStatus::Full),
                ("Half day", CellStatus::Partial),
                ("Leave", CellStatus::Leave(LeaveCategory::Vacation)),
                ("Empty", CellStatus::Empty),
                ("Holiday", CellStatus::Holiday),
                ("Weekend", CellStatus::Weekend),
            ],
        };
        Self { entries }
    }
}

impl RenderableWidget for Legend {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.height == 0 {
            return;
        }
        let mut x = area.x + 1;
        for (label, status) in &self.entries {
            let needed = 2 + label.len() as u16;
            if x + needed > area.right() {
                break;
            }
            buf.set_string(x, area.y, SWATCH, Style::default().fg(theme.status_color(*status)));
            buf.set_string(x + 2, area.y, label, Style::default());
            x += needed + 2;
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

    #[test]
    fn test_leave_legend() {
        let buf = render_widget(&Legend::for_mode(AppMode::Leave), 40, 1);
        assert_buffer_line(&buf, 0, " ■ Approved  ■ RTT  ■ Pending           ");
        let theme = test_theme();
        assert_eq!(buf[(1, 0)].fg, theme.status_color(CellStatus::Approved));
    }

    #[test]
    fn test_entries_that_do_not_fit_are_dropped() {
        let buf = render_widget(&Legend::for_mode(AppMode::Cra), 12, 1);
        assert_buffer_line(&buf, 0, " ■ Full day ");
    }
}
