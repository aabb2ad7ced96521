/// CalendarGridWidget - the three header lines, the employee column and the
/// visible part of the day strip
///
/// Only days inside the scroller's visible range are drawn; a cell that is
/// partly scrolled out is clipped column by column.
use chrono::Datelike;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::calendar::period::month_name;
use crate::calendar::{
    CalendarGridController, CellRenderState, CellStatus, DayStatus, DayValue, GridEntity, GridPoint, LeaveCategory,
    Period,
};
use crate::config::ThemeConfig;
use crate::tui::layout::{Viewport, HEADER_HEIGHT};
use crate::tui::widgets::RenderableWidget;

const HEADER_LABEL: &str = "Employee";

pub struct CalendarGridWidget<'a, E, S, D> {
    pub grid: &'a CalendarGridController<E, S, D>,
    /// First employee row shown
    pub row_offset: usize,
    pub name_width: u16,
}

impl<'a, E, S, D> CalendarGridWidget<'a, E, S, D>
where
    E: GridEntity,
    S: DayStatus,
    D: Clone,
{
    pub fn new(grid: &'a CalendarGridController<E, S, D>, row_offset: usize, name_width: u16) -> Self {
        Self {
            grid,
            row_offset,
            name_width,
        }
    }

    fn render_header(&self, names: Rect, strip: Rect, viewport: &Viewport, buf: &mut Buffer, theme: &ThemeConfig) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let period = self.grid.period();
        buf.set_stringn(names.x, names.y, period.to_string(), names.width as usize, bold);
        if names.height >= HEADER_HEIGHT {
            buf.set_stringn(names.x, names.y + 2, HEADER_LABEL, names.width as usize, Style::default());
        }

        let range = self.grid.visible_day_range();
        for index in range.clone() {
            let Some(header) = self.grid.header_state(index) else {
                continue;
            };
            let x = viewport.day_x(strip, index);
            let width = viewport.cell_width as usize;

            if header.date.day() == 1 || index == range.start {
                let label = match period {
                    Period::Year(_) => month_name(header.date.month()).unwrap_or_default().to_string(),
                    Period::Month { .. } => period.to_string(),
                };
                put(buf, strip, x, strip.y, &label, bold);
            }

            let mut style = Style::default();
            if header.is_weekend {
                style = style.fg(Color::DarkGray);
            } else if header.is_holiday {
                style = style.fg(theme.status_color(CellStatus::Holiday));
            }
            if header.column_hovered {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let day = format!("{:^width$}", header.date.day(), width = width);
            let weekday: String = header.weekday_label.chars().take(2).collect();
            let weekday = format!("{:^width$}", weekday, width = width);
            if strip.height > 1 {
                put(buf, strip, x, strip.y + 1, &day, style);
            }
            if strip.height > 2 {
                put(buf, strip, x, strip.y + 2, &weekday, style);
            }
        }
    }

    fn render_rows(&self, names: Rect, strip: Rect, viewport: &Viewport, buf: &mut Buffer, theme: &ThemeConfig) {
        let hovered_row = self.grid.hover().map(|h| h.row);
        let range = self.grid.visible_day_range();

        for (row, calendar) in self.grid.calendars().iter().enumerate().skip(self.row_offset) {
            let Some(y) = viewport.row_y(strip, row) else {
                break;
            };

            let name_style = if hovered_row == Some(row) {
                Style::default().fg(theme.selection_fg).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let name = truncate(&calendar.entity.display_name(), names.width.saturating_sub(1) as usize);
            buf.set_stringn(names.x, y, name, names.width as usize, name_style);

            for index in range.clone() {
                let Some(state) = self.grid.cell_state(GridPoint::new(row, index)) else {
                    continue;
                };
                let x = viewport.day_x(strip, index);
                let style = cell_style(&state, theme);
                let width = viewport.cell_width as usize;
                let glyph = format!("{:^width$}", cell_glyph(&state), width = width);
                for line in 0..viewport.cell_height {
                    let y = y + line;
                    if y >= strip.bottom() {
                        break;
                    }
                    let text = if line == viewport.cell_height / 2 {
                        glyph.clone()
                    } else {
                        " ".repeat(width)
                    };
                    put(buf, strip, x, y, &text, style);
                }
            }
        }
    }
}

impl<E, S, D> RenderableWidget for CalendarGridWidget<'_, E, S, D>
where
    E: GridEntity,
    S: DayStatus,
    D: Clone,
{
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let [header, body] =
            Layout::vertical([Constraint::Length(HEADER_HEIGHT), Constraint::Min(0)]).areas(area);
        let name_width = self.name_width.min(area.width / 2);
        let split = |rect: Rect| -> [Rect; 2] {
            Layout::horizontal([Constraint::Length(name_width), Constraint::Min(0)]).areas(rect)
        };
        let [header_names, header_strip] = split(header);
        let [names, strip] = split(body);

        let viewport = Viewport::of(self.grid, self.row_offset);
        self.render_header(header_names, header_strip, &viewport, buf, theme);
        self.render_rows(names, strip, &viewport, buf, theme);
    }
}

/// Write `text` starting at column `x`, dropping whatever falls outside `clip`
fn put(buf: &mut Buffer, clip: Rect, x: i64, y: u16, text: &str, style: Style) {
    if y < clip.y || y >= clip.bottom() {
        return;
    }
    let mut column = x;
    for ch in text.chars() {
        let width = ch.width().unwrap_or(0) as i64;
        if column >= clip.x as i64 && column + width <= clip.right() as i64 {
            let mut tmp = [0u8; 4];
            buf[(column as u16, y)].set_symbol(ch.encode_utf8(&mut tmp)).set_style(style);
        }
        column += width.max(1);
    }
}

/// Cut `text` to `max` columns, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    if max > 0 {
        out.push('…');
    }
    out
}

/// One-letter code of a leave category
pub fn category_code(category: LeaveCategory) -> &'static str {
    match category {
        LeaveCategory::Vacation => "V",
        LeaveCategory::Rtt => "R",
        LeaveCategory::SickLeave => "S",
        LeaveCategory::UnpaidLeave => "U",
        LeaveCategory::MaternityLeave => "M",
        LeaveCategory::PaternityLeave => "P",
        LeaveCategory::Training => "T",
        LeaveCategory::Other => "O",
    }
}

pub fn cell_glyph(state: &CellRenderState) -> &'static str {
    match (state.status, state.value) {
        (CellStatus::Pending, _) => "?",
        (CellStatus::Rejected, _) => "x",
        (_, Some(DayValue::Leave(category))) => category_code(category),
        (_, Some(DayValue::Days(days))) if days >= 1.0 => "1",
        (_, Some(DayValue::Days(days))) if days > 0.0 => "½",
        (CellStatus::Holiday, _) => "*",
        _ if state.is_selected => "•",
        _ => " ",
    }
}

pub fn cell_style(state: &CellRenderState, theme: &ThemeConfig) -> Style {
    let background = if state.in_drag_preview {
        theme.drag_preview_bg
    } else {
        theme.status_color(state.status)
    };
    let mut style = Style::default().bg(background).fg(Color::White);
    if state.is_selected {
        style = style.fg(theme.selection_fg).add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if state.row_focused && state.column_focused {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{GridLayout, HolidayCalculator, Modifiers};
    use crate::domain::leave::{self, LeaveGrid, LeaveStatus, LeaveType};
    use crate::fixtures;
    use crate::tui::widgets::testing::*;
    use chrono::NaiveDate;

    const NAMES: u16 = 10;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    /// May 2025 leave grid, 3-column cells, ten days visible
    fn grid() -> LeaveGrid {
        let layout = GridLayout {
            cell_width: 3.0,
            cell_height: 1.0,
            employee_column_width: NAMES as f64,
        };
        let mut grid = LeaveGrid::new(
            leave::grid_options(layout, 12.0),
            Period::Month { year: 2025, month: 5 },
        );
        let employees = vec![
            fixtures::employee("e1", "Camille", "Bernard", "Engineering", "Dev"),
            fixtures::employee("e2", "Hugo", "Petit", "Engineering", "Dev"),
        ];
        let requests = vec![fixtures::leave_request(
            "r1",
            "e2",
            LeaveType::Vacation,
            LeaveStatus::Pending,
            may(5),
            may(6),
        )];
        let calendars = leave::build_calendars(&employees, &requests, grid.day_facts());
        grid.set_calendars(calendars);
        grid.resize(30.0);
        grid.settle();
        grid
    }

    fn strip_line(days: impl Iterator<Item = String>) -> String {
        format!("{:w$}{}", "", days.collect::<String>(), w = NAMES as usize)
    }

    #[test]
    fn test_header_lines() {
        let grid = grid();
        let widget = CalendarGridWidget::new(&grid, 0, NAMES);
        let buf = render_widget(&widget, 40, 5);

        assert_buffer_line(&buf, 0, &format!("{:10}{:30}", "May 2025", "May 2025"));
        assert_buffer_line(&buf, 1, &strip_line((1..=10).map(|d| format!("{:^3}", d))));
        // May 1 2025 is a Thursday
        let weekdays = ["Th", "Fr", "Sa", "Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];
        assert_eq!(
            buffer_line(&buf, 2),
            format!("{:10}{}", HEADER_LABEL, weekdays.iter().map(|w| format!("{:^3}", w)).collect::<String>())
        );
    }

    #[test]
    fn test_rows_show_names_and_glyphs() {
        let grid = grid();
        let widget = CalendarGridWidget::new(&grid, 0, NAMES);
        let buf = render_widget(&widget, 40, 5);

        assert!(buffer_line(&buf, 3).starts_with("Camille …"));
        // Labour day is a holiday
        assert_eq!(buf[(NAMES + 1, 3)].symbol(), "*");
        // Pending request on May 5 and 6
        assert_eq!(buf[(NAMES + 13, 4)].symbol(), "?");
        assert_eq!(buf[(NAMES + 16, 4)].symbol(), "?");
        assert_eq!(buf[(NAMES + 19, 4)].symbol(), " ");
    }

    #[test]
    fn test_status_backgrounds() {
        let grid = grid();
        let theme = test_theme();
        let buf = render_widget(&CalendarGridWidget::new(&grid, 0, NAMES), 40, 5);
        assert_eq!(buf[(NAMES + 13, 4)].bg, theme.status_color(CellStatus::Pending));
        assert_eq!(buf[(NAMES + 7, 3)].bg, theme.status_color(CellStatus::Weekend));
    }

    #[test]
    fn test_selection_and_drag_preview_styles() {
        let mut grid = grid();
        grid.click(GridPoint::new(0, 1), Modifiers::CTRL);
        // May 7 to May 9 on the second row; May 8 is a holiday
        grid.pointer_down(GridPoint::new(1, 6));
        grid.pointer_enter(GridPoint::new(1, 8));
        let theme = test_theme();
        let buf = render_widget(&CalendarGridWidget::new(&grid, 0, NAMES), 40, 5);

        let selected = &buf[(NAMES + 4, 3)];
        assert_eq!(selected.fg, theme.selection_fg);
        assert_eq!(selected.symbol(), "•");
        assert_eq!(buf[(NAMES + 19, 4)].bg, theme.drag_preview_bg);
        assert_eq!(buf[(NAMES + 25, 4)].bg, theme.drag_preview_bg);
        assert_eq!(buf[(NAMES + 22, 4)].bg, theme.status_color(CellStatus::Holiday));
    }

    #[test]
    fn test_scrolled_strip_clips_partial_cells() {
        let mut grid = grid();
        grid.scroll_to(4.0);
        let buf = render_widget(&CalendarGridWidget::new(&grid, 0, NAMES), 40, 5);
        // Four columns in: the first column of day 2 is scrolled out
        let expected: String = (2..=12).map(|d| format!("{:^3}", d)).collect();
        assert_eq!(buffer_line(&buf, 1), format!("{:10}{}", "", &expected[1..31]));
    }

    #[test]
    fn test_row_offset_skips_rows() {
        let grid = grid();
        let buf = render_widget(&CalendarGridWidget::new(&grid, 1, NAMES), 40, 5);
        assert!(buffer_line(&buf, 3).starts_with("Hugo Pet…"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Léa Durand", 20), "Léa Durand");
        assert_eq!(truncate("Léa Durand", 6), "Léa D…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_holiday_header_color() {
        let mut holidays = HolidayCalculator::new();
        assert!(holidays.is_holiday(may(1)));
        let grid = grid();
        let theme = test_theme();
        let buf = render_widget(&CalendarGridWidget::new(&grid, 0, NAMES), 40, 5);
        assert_eq!(buf[(NAMES + 1, 1)].fg, theme.status_color(CellStatus::Holiday));
    }
}
