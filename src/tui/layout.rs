/// Screen geometry and pointer hit-testing
///
/// The screen is a fixed stack of rows: title, three header lines, the
/// employee rows, a navigation/scrollbar row, the legend and the two-line
/// status bar. Every row except the title and status bar is split into the
/// employee-name column and the day strip.
use ratatui::layout::{Constraint, Layout, Rect};

use crate::calendar::{CalendarGridController, DayStatus, GridEntity, GridPoint};

pub const TITLE_HEIGHT: u16 = 1;
pub const HEADER_HEIGHT: u16 = 3;
pub const SCROLLBAR_HEIGHT: u16 = 1;
pub const LEGEND_HEIGHT: u16 = 1;
pub const STATUS_BAR_HEIGHT: u16 = 2;

/// Width of the "◀ " and " ▶" hot zones of the navigation cell
pub const ARROW_WIDTH: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenLayout {
    pub title: Rect,
    pub header_names: Rect,
    pub header_days: Rect,
    pub names: Rect,
    pub days: Rect,
    pub nav: Rect,
    pub scrollbar: Rect,
    pub legend: Rect,
    pub status: Rect,
}

impl ScreenLayout {
    pub fn compute(area: Rect, name_width: u16) -> Self {
        let [title, header, body, bar, legend, status] = Layout::vertical([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(SCROLLBAR_HEIGHT),
            Constraint::Length(LEGEND_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .areas(area);

        let name_width = name_width.min(area.width / 2);
        let split = |rect: Rect| -> (Rect, Rect) {
            let [left, right] =
                Layout::horizontal([Constraint::Length(name_width), Constraint::Min(0)]).areas(rect);
            (left, right)
        };
        let (header_names, header_days) = split(header);
        let (names, days) = split(body);
        let (nav, scrollbar) = split(bar);

        Self {
            title,
            header_names,
            header_days,
            names,
            days,
            nav,
            scrollbar,
            legend,
            status,
        }
    }

    /// Width available to the day strip, in columns
    pub fn strip_width(&self) -> u16 {
        self.days.width
    }

    /// Employee rows that fit, given the row height
    pub fn visible_rows(&self, cell_height: u16) -> usize {
        (self.days.height / cell_height.max(1)) as usize
    }
}

/// What the pointer is over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTarget {
    Cell(GridPoint),
    Name(usize),
    Header(usize),
    PreviousArrow,
    NextArrow,
    Thumb,
    /// Scrollbar track, left or right of the thumb
    Track { before_thumb: bool },
    Outside,
}

/// Scroll state of the day strip, in terminal columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Scroll position rounded to whole columns
    pub offset: i64,
    pub cell_width: u16,
    pub cell_height: u16,
    pub row_offset: usize,
    pub rows: usize,
    pub days: usize,
    pub thumb_width_percent: u16,
    pub thumb_position_percent: u16,
}

impl Viewport {
    pub fn of<E, S, D>(grid: &CalendarGridController<E, S, D>, row_offset: usize) -> Self
    where
        E: GridEntity,
        S: DayStatus,
        D: Clone,
    {
        let layout = grid.options().layout;
        let scroller = grid.scroller();
        Self {
            offset: scroller.position().round() as i64,
            cell_width: layout.cell_width.round().max(1.0) as u16,
            cell_height: layout.cell_height.round().max(1.0) as u16,
            row_offset,
            rows: grid.calendars().len(),
            days: grid.day_count(),
            thumb_width_percent: scroller.thumb_width_percent().round() as u16,
            thumb_position_percent: scroller.thumb_position_percent().round() as u16,
        }
    }

    /// Screen column of a day's left edge (may be off-screen)
    pub fn day_x(&self, strip: Rect, day_index: usize) -> i64 {
        strip.x as i64 + day_index as i64 * self.cell_width as i64 - self.offset
    }

    /// Day under screen column `x` of the strip
    pub fn day_at(&self, strip: Rect, x: u16) -> Option<usize> {
        if x < strip.x || x >= strip.right() {
            return None;
        }
        let absolute = (x - strip.x) as i64 + self.offset;
        if absolute < 0 {
            return None;
        }
        let index = (absolute / self.cell_width.max(1) as i64) as usize;
        (index < self.days).then_some(index)
    }

    /// Row under screen line `y` of the body
    pub fn row_at(&self, body: Rect, y: u16) -> Option<usize> {
        if y < body.y || y >= body.bottom() {
            return None;
        }
        let row = ((y - body.y) / self.cell_height.max(1)) as usize + self.row_offset;
        (row < self.rows).then_some(row)
    }

    /// Screen line of a row's top edge, if it is scrolled into view
    pub fn row_y(&self, body: Rect, row: usize) -> Option<u16> {
        let shown = row.checked_sub(self.row_offset)?;
        let y = body.y as usize + shown * self.cell_height.max(1) as usize;
        (y < body.bottom() as usize).then_some(y as u16)
    }

    /// Thumb start (relative to the track) and length, in columns
    pub fn thumb_span(&self, track_width: u16) -> (u16, u16) {
        thumb_span(track_width, self.thumb_width_percent, self.thumb_position_percent)
    }
}

pub fn thumb_span(track_width: u16, width_percent: u16, position_percent: u16) -> (u16, u16) {
    if track_width == 0 {
        return (0, 0);
    }
    let len = ((track_width as u32 * width_percent.min(100) as u32 + 50) / 100).max(1) as u16;
    let len = len.min(track_width);
    let start = ((track_width as u32 * position_percent.min(100) as u32 + 50) / 100) as u16;
    (start.min(track_width - len), len)
}

fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

pub fn hit_test(layout: &ScreenLayout, viewport: &Viewport, x: u16, y: u16) -> HitTarget {
    if contains(layout.days, x, y) {
        return match (viewport.row_at(layout.days, y), viewport.day_at(layout.days, x)) {
            (Some(row), Some(day_index)) => HitTarget::Cell(GridPoint::new(row, day_index)),
            _ => HitTarget::Outside,
        };
    }
    if contains(layout.names, x, y) {
        return viewport
            .row_at(layout.names, y)
            .map_or(HitTarget::Outside, HitTarget::Name);
    }
    if contains(layout.header_days, x, y) {
        return viewport
            .day_at(layout.header_days, x)
            .map_or(HitTarget::Outside, HitTarget::Header);
    }
    if contains(layout.nav, x, y) {
        if x < layout.nav.x + ARROW_WIDTH {
            return HitTarget::PreviousArrow;
        }
        if x >= layout.nav.right().saturating_sub(ARROW_WIDTH) {
            return HitTarget::NextArrow;
        }
        return HitTarget::Outside;
    }
    if contains(layout.scrollbar, x, y) {
        let (start, len) = viewport.thumb_span(layout.scrollbar.width);
        let rel = x - layout.scrollbar.x;
        if rel >= start && rel < start + len {
            return HitTarget::Thumb;
        }
        return HitTarget::Track {
            before_thumb: rel < start,
        };
    }
    HitTarget::Outside
}
