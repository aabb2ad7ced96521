//! Interactive calendar grid engine
//!
//! An entity × day grid with holiday-aware day sequences, sparse cell
//! selection, rectangular drag selection and horizontal virtual scrolling.
//! Nothing here performs I/O or fails; invalid coordinates are ignored.

pub mod date_index;
pub mod day;
pub mod drag;
pub mod grid;
pub mod holidays;
pub mod listener;
pub mod period;
pub mod scroller;
pub mod selection;

pub use date_index::{DateIndexer, DayFacts, DaySequence};
pub use day::{CalendarDay, CellStatus, DayStatus, DayValue, EntityCalendar, GridEntity, LeaveCategory};
pub use drag::{DragController, DragPhase, GridPoint};
pub use grid::{
    CalendarGridController, CellRef, CellRenderState, GridEvent, GridLayout, GridOptions, HeaderState, Modifiers,
};
pub use holidays::{easter_sunday, Holiday, HolidayCalculator, HolidayKind, YearHolidays};
pub use listener::{GlobalPointerEvent, ListenerGuard, ListenerRegistry};
pub use period::{Period, ViewMode};
pub use scroller::ViewportScroller;
pub use selection::{CellKey, EditableCells, SelectionModel};
