//! Calendar grid controller
//!
//! Owns one of every engine part (holiday cache, day index, selection, drag,
//! scroller) and turns pointer gestures into [`GridEvent`]s for the host.
//! The host owns the period and the data: it answers
//! [`GridEvent::PeriodChangeRequested`] by calling
//! [`CalendarGridController::set_period`] and then supplying fresh calendars
//! through [`CalendarGridController::set_calendars`].

use std::ops::Range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::date_index::{DateIndexer, DayFacts};
use super::day::{CalendarDay, CellStatus, DayStatus, DayValue, EntityCalendar, GridEntity};
use super::drag::{DragController, GridPoint};
use super::holidays::{HolidayCalculator, HolidayKind};
use super::period::{month_lengths, Period, ViewMode, WEEKDAY_LABELS};
use super::scroller::{ViewportScroller, DEFAULT_SCROLL_STEP};
use super::selection::{CellKey, SelectionModel};

/// Cell and column measurements in host units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridLayout {
    pub cell_width: f64,
    pub cell_height: f64,
    pub employee_column_width: f64,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            cell_width: 24.0,
            cell_height: 32.0,
            employee_column_width: 300.0,
        }
    }
}

/// Capabilities of one grid instance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    pub view_mode: ViewMode,
    pub allow_multi_select: bool,
    pub allow_drag_select: bool,
    pub allow_cell_editing: bool,
    pub layout: GridLayout,
    pub scroll_step: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Year,
            allow_multi_select: true,
            allow_drag_select: true,
            allow_cell_editing: false,
            layout: GridLayout::default(),
            scroll_step: DEFAULT_SCROLL_STEP,
        }
    }
}

/// Modifier keys held during a gesture
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Ctrl or Cmd: add to the selection
    pub ctrl: bool,
    /// Extend from the last selected cell of the same row
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
    };
    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        shift: false,
    };
    pub const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
    };
}

/// A resolved cell: its entity, its day and where the day sits
#[derive(Debug, Clone, PartialEq)]
pub struct CellRef<E, S, D = ()> {
    pub entity: E,
    pub day: CalendarDay<S, D>,
    pub day_index: usize,
}

/// Notifications for the host screen
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent<E, S, D = ()> {
    CellClick(CellRef<E, S, D>),
    CellEditStart(CellRef<E, S, D>),
    BulkSelectionReady {
        coordinates: Vec<CellKey>,
        resolved: Vec<CellRef<E, S, D>>,
    },
    PeriodChangeRequested(Period),
    ExportRequested {
        entity: E,
    },
}

/// Everything a renderer needs to draw one cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRenderState {
    pub status: CellStatus,
    pub value: Option<DayValue>,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub is_selected: bool,
    pub in_drag_preview: bool,
    pub is_editable: bool,
    pub row_focused: bool,
    pub column_focused: bool,
}

/// Render state of one day column header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderState {
    pub date: NaiveDate,
    pub weekday_label: &'static str,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub holiday: Option<HolidayKind>,
    pub column_hovered: bool,
}

pub struct CalendarGridController<E, S, D = ()> {
    options: GridOptions,
    period: Period,
    holidays: HolidayCalculator,
    indexer: DateIndexer,
    facts: Vec<DayFacts>,
    calendars: Vec<EntityCalendar<E, S, D>>,
    selection: SelectionModel,
    drag: DragController,
    scroller: ViewportScroller,
    last_selected: Option<CellKey>,
    hover: Option<GridPoint>,
    recenter_pending: bool,
}

impl<E, S, D> CalendarGridController<E, S, D>
where
    E: GridEntity,
    S: DayStatus,
    D: Clone,
{
    pub fn new(options: GridOptions, period: Period) -> Self {
        let mut grid = Self {
            options,
            period,
            holidays: HolidayCalculator::new(),
            indexer: DateIndexer::new(),
            facts: Vec::new(),
            calendars: Vec::new(),
            selection: SelectionModel::new(),
            drag: DragController::new(),
            scroller: ViewportScroller::new(options.scroll_step),
            last_selected: None,
            hover: None,
            recenter_pending: false,
        };
        grid.rebuild_days();
        grid
    }

    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn view_mode(&self) -> ViewMode {
        self.period.view_mode()
    }

    /// Switch to another period
    ///
    /// Selection, drag, hover and the day index are dropped before the new
    /// day sequence is built, so no coordinate from the old period survives.
    /// Rows are dropped too; the host must supply calendars for the new
    /// period and then call [`settle`](Self::settle).
    pub fn set_period(&mut self, period: Period) {
        debug!("GRID: period {} -> {}", self.period, period);
        self.selection.clear();
        self.drag.cancel();
        self.last_selected = None;
        self.hover = None;
        self.indexer.invalidate();
        self.calendars.clear();

        self.period = period;
        self.options.view_mode = period.view_mode();
        self.rebuild_days();
        self.recenter_pending = self.view_mode() == ViewMode::Year;
    }

    fn rebuild_days(&mut self) {
        let sequence = self.indexer.sequence_for(self.period);
        self.facts = sequence.facts(&mut self.holidays);

        let widths = match self.period {
            Period::Year(year) => month_lengths(year)
                .iter()
                .map(|days| *days as f64 * self.options.layout.cell_width)
                .collect(),
            Period::Month { .. } => Vec::new(),
        };
        self.scroller.set_period_widths(widths);
        let container = self.scroller.container_width();
        self.scroller
            .recompute_dimensions(container, self.facts.len(), self.options.layout.cell_width);
    }

    /// Drop the holiday memo and day index, then rebuild for the current period
    pub fn clear_caches(&mut self) {
        self.holidays.clear();
        self.indexer.invalidate();
        self.rebuild_days();
    }

    /// Calendar facts of every day of the current period
    pub fn day_facts(&self) -> &[DayFacts] {
        &self.facts
    }

    pub fn day_count(&self) -> usize {
        self.facts.len()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.indexer.current().and_then(|seq| seq.index_of(date))
    }

    pub fn holidays_mut(&mut self) -> &mut HolidayCalculator {
        &mut self.holidays
    }

    /// Replace the rows wholesale
    pub fn set_calendars(&mut self, calendars: Vec<EntityCalendar<E, S, D>>) {
        debug!("GRID: {} rows supplied for {}", calendars.len(), self.period);
        self.calendars = calendars;
        if let Some(hover) = self.hover {
            if hover.row >= self.calendars.len() {
                self.hover = None;
            }
        }
    }

    /// Recompute scroll geometry once the host's data has landed
    ///
    /// After a period change in year view this also centers the current month.
    pub fn settle(&mut self) {
        let container = self.scroller.container_width();
        self.scroller
            .recompute_dimensions(container, self.day_count(), self.options.layout.cell_width);
        if self.recenter_pending {
            self.recenter_pending = false;
            let month = self.scroller.current_period();
            self.scroller.center_on_period(month);
        }
    }

    /// New width of the day area (excluding the entity column)
    pub fn resize(&mut self, container_width: f64) {
        self.scroller
            .recompute_dimensions(container_width, self.day_count(), self.options.layout.cell_width);
    }

    pub fn calendars(&self) -> &[EntityCalendar<E, S, D>] {
        &self.calendars
    }

    pub fn row_of(&self, entity_id: &str) -> Option<usize> {
        self.calendars.iter().position(|c| c.entity_id() == entity_id)
    }

    pub fn day_at(&self, point: GridPoint) -> Option<&CalendarDay<S, D>> {
        self.calendars.get(point.row)?.day(point.day_index)
    }

    fn cell_ref(&self, point: GridPoint) -> Option<CellRef<E, S, D>> {
        let calendar = self.calendars.get(point.row)?;
        let day = calendar.day(point.day_index)?;
        Some(CellRef {
            entity: calendar.entity.clone(),
            day: day.clone(),
            day_index: point.day_index,
        })
    }

    /// Look a coordinate key up in the current rows
    pub fn resolve(&self, key: &CellKey) -> Option<CellRef<E, S, D>> {
        let row = self.row_of(&key.entity_id)?;
        self.cell_ref(GridPoint::new(row, key.day_index))
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Multi-select mode lasts as long as something is selected
    pub fn is_multi_select_mode(&self) -> bool {
        !self.selection.is_empty()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.last_selected = None;
    }

    /// Single click on a cell
    ///
    /// With Ctrl, or while cells are already selected, the click edits the
    /// selection (Shift extends from the last selected cell of the same row)
    /// and nothing is emitted. Otherwise the host gets a
    /// [`GridEvent::CellClick`].
    pub fn click(&mut self, point: GridPoint, mods: Modifiers) -> Option<GridEvent<E, S, D>> {
        let calendar = self.calendars.get(point.row)?;
        let day = calendar.day(point.day_index)?;

        if !(self.options.allow_multi_select && (mods.ctrl || self.is_multi_select_mode())) {
            return self.cell_ref(point).map(GridEvent::CellClick);
        }

        let entity_id = calendar.entity_id().to_string();
        let anchor = self
            .last_selected
            .as_ref()
            .filter(|last| mods.shift && last.entity_id == entity_id)
            .map(|last| last.day_index);

        match anchor {
            Some(from) => {
                let added = self
                    .selection
                    .extend_range(&entity_id, from, point.day_index, &calendar.days);
                debug!(
                    "SELECTION: range {}..{} on {} added {}",
                    from, point.day_index, entity_id, added
                );
            }
            None => {
                // Only a cell that ends up selected can anchor a later range
                if !self.selection.toggle(&entity_id, point.day_index, day) {
                    return None;
                }
            }
        }
        self.last_selected = Some(CellKey::new(entity_id, point.day_index));
        None
    }

    pub fn double_click(&mut self, point: GridPoint) -> Option<GridEvent<E, S, D>> {
        if !self.options.allow_cell_editing {
            return None;
        }
        let day = self.day_at(point)?;
        if !day.is_editable {
            return None;
        }
        self.cell_ref(point).map(GridEvent::CellEditStart)
    }

    /// Button pressed on a cell. Returns whether a drag was armed.
    pub fn pointer_down(&mut self, point: GridPoint) -> bool {
        if !self.options.allow_drag_select {
            return false;
        }
        self.drag.press(point, &self.calendars)
    }

    /// Pointer entered a cell. Returns whether the drag preview changed.
    pub fn pointer_enter(&mut self, point: GridPoint) -> bool {
        self.hover = Some(point);
        if !self.drag.is_active() {
            return false;
        }
        self.drag.enter(point, &self.calendars)
    }

    pub fn pointer_leave(&mut self) {
        self.hover = None;
    }

    /// Button released anywhere, inside the grid or not
    ///
    /// Finishes a drag (returning how many cells were added) and any
    /// scrollbar thumb drag.
    pub fn pointer_up(&mut self, mods: Modifiers) -> Option<usize> {
        self.scroller.end_thumb_drag();
        let keep_existing = mods.ctrl || self.is_multi_select_mode();
        self.drag.release(keep_existing, &mut self.selection)
    }

    /// Abort an in-progress drag, keeping the selection as it was
    pub fn cancel_drag(&mut self) -> bool {
        self.drag.cancel()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn hover(&self) -> Option<GridPoint> {
        self.hover
    }

    /// Every selected coordinate that still resolves, in (entity, day) order
    ///
    /// Keys whose entity or day has disappeared are skipped.
    pub fn resolve_selection(&self) -> Vec<CellRef<E, S, D>> {
        let keys = self.selection.sorted();
        let resolved: Vec<_> = keys.iter().filter_map(|key| self.resolve(key)).collect();
        if resolved.len() < keys.len() {
            debug!(
                "SELECTION: dropped {} unresolved of {} selected cells",
                keys.len() - resolved.len(),
                keys.len()
            );
        }
        resolved
    }

    /// Hand the current selection to the host for a bulk action
    pub fn manage_selection(&self) -> Option<GridEvent<E, S, D>> {
        if self.selection.is_empty() {
            return None;
        }
        let coordinates = self.selection.sorted();
        let resolved = self.resolve_selection();
        debug!(
            "SELECTION: bulk batch of {} ({} resolved)",
            coordinates.len(),
            resolved.len()
        );
        Some(GridEvent::BulkSelectionReady {
            coordinates,
            resolved,
        })
    }

    pub fn request_export(&self, row: usize) -> Option<GridEvent<E, S, D>> {
        let entity = self.calendars.get(row)?.entity.clone();
        Some(GridEvent::ExportRequested { entity })
    }

    pub fn cell_state(&self, point: GridPoint) -> Option<CellRenderState> {
        let calendar = self.calendars.get(point.row)?;
        let day = calendar.day(point.day_index)?;
        let key = CellKey::new(calendar.entity_id(), point.day_index);

        Some(CellRenderState {
            status: day.cell_status(),
            value: day.value,
            is_weekend: day.is_weekend,
            is_holiday: day.is_holiday,
            is_selected: self.selection.contains(&key),
            in_drag_preview: self.drag.in_preview(&key),
            is_editable: day.is_editable,
            row_focused: self.hover.map_or(false, |h| h.row == point.row),
            column_focused: self.hover.map_or(false, |h| h.day_index == point.day_index),
        })
    }

    pub fn header_state(&self, day_index: usize) -> Option<HeaderState> {
        let facts = self.facts.get(day_index)?;
        Some(HeaderState {
            date: facts.date,
            weekday_label: WEEKDAY_LABELS[facts.day_of_week as usize % 7],
            is_weekend: facts.is_weekend,
            is_holiday: facts.is_holiday,
            holiday: facts.holiday,
            column_hovered: self.hover.map_or(false, |h| h.day_index == day_index),
        })
    }

    /// Day indices currently inside the viewport
    pub fn visible_day_range(&self) -> Range<usize> {
        self.scroller
            .visible_range(self.options.layout.cell_width, self.day_count())
    }

    pub fn scroller(&self) -> &ViewportScroller {
        &self.scroller
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.scroller.scroll_by(delta);
    }

    pub fn scroll_to(&mut self, position: f64) {
        self.scroller.scroll_to(position);
    }

    pub fn scroll_left(&mut self) {
        self.scroller.scroll_left();
    }

    pub fn scroll_right(&mut self) {
        self.scroller.scroll_right();
    }

    pub fn begin_thumb_drag(&mut self, x: f64) {
        self.scroller.begin_thumb_drag(x);
    }

    pub fn drag_thumb_to(&mut self, x: f64) -> bool {
        self.scroller.drag_thumb_to(x)
    }

    /// Month currently under the viewport (0-based), year view only
    pub fn current_month(&self) -> Option<usize> {
        match self.period {
            Period::Year(_) => Some(self.scroller.current_period()),
            Period::Month { month, .. } => Some(month.saturating_sub(1) as usize),
        }
    }

    /// Previous month: scroll in year view, otherwise ask the host
    pub fn previous_month(&mut self) -> Option<GridEvent<E, S, D>> {
        match self.period {
            Period::Year(_) => {
                self.scroller.previous_period();
                None
            }
            Period::Month { .. } => Some(GridEvent::PeriodChangeRequested(self.period.previous())),
        }
    }

    /// Next month: scroll in year view, otherwise ask the host
    pub fn next_month(&mut self) -> Option<GridEvent<E, S, D>> {
        match self.period {
            Period::Year(_) => {
                self.scroller.next_period();
                None
            }
            Period::Month { .. } => Some(GridEvent::PeriodChangeRequested(self.period.next())),
        }
    }

    /// Center month `index` (0-based) in year view
    pub fn go_to_month(&mut self, index: usize) -> bool {
        match self.period {
            Period::Year(_) => self.scroller.go_to_period(index),
            Period::Month { .. } => false,
        }
    }

    /// Bring `today` into view, asking the host for its period if needed
    pub fn go_to_today(&mut self, today: NaiveDate) -> Option<GridEvent<E, S, D>> {
        if !self.period.contains(today) {
            return Some(GridEvent::PeriodChangeRequested(Period::containing(
                today,
                self.view_mode(),
            )));
        }
        if let Some(index) = self.index_of(today) {
            if self.view_mode() == ViewMode::Year {
                let cell = self.options.layout.cell_width;
                let target = index as f64 * cell - (self.scroller.container_width() - cell) / 2.0;
                self.scroller.scroll_to(target);
            }
        }
        None
    }

    pub fn request_previous_period(&self) -> GridEvent<E, S, D> {
        GridEvent::PeriodChangeRequested(self.period.previous())
    }

    pub fn request_next_period(&self) -> GridEvent<E, S, D> {
        GridEvent::PeriodChangeRequested(self.period.next())
    }

    /// Ask for the same range in the other view mode
    pub fn request_view_mode(&self, mode: ViewMode, focus_month: u32) -> Option<GridEvent<E, S, D>> {
        if mode == self.view_mode() {
            return None;
        }
        let year = self.period.year();
        let period = match mode {
            ViewMode::Year => Period::Year(year),
            ViewMode::Month => Period::Month {
                year,
                month: focus_month.clamp(1, 12),
            },
        };
        Some(GridEvent::PeriodChangeRequested(period))
    }
}

impl<E, S, D> std::fmt::Debug for CalendarGridController<E, S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarGridController")
            .field("period", &self.period)
            .field("rows", &self.calendars.len())
            .field("days", &self.facts.len())
            .field("selected", &self.selection.len())
            .finish()
    }
}
