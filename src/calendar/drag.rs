//! Rectangular drag selection
//!
//! `Idle -> Armed -> Dragging -> Idle`. A press on an editable cell arms the
//! controller, the first pointer move starts dragging, and every further move
//! rebuilds the rectangle preview. Release commits the preview into a
//! [`SelectionModel`]; cancel drops it.

use tracing::debug;

use super::day::{DayStatus, EntityCalendar, GridEntity};
use super::selection::{CellKey, EditableCells, SelectionModel};

/// Cell position in grid coordinates (row order of the supplied calendars)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub row: usize,
    pub day_index: usize,
}

impl GridPoint {
    pub fn new(row: usize, day_index: usize) -> Self {
        Self { row, day_index }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragPhase {
    #[default]
    Idle,
    Armed {
        anchor: GridPoint,
    },
    Dragging {
        anchor: GridPoint,
        current: GridPoint,
        preview: EditableCells,
    },
}

#[derive(Debug, Default)]
pub struct DragController {
    phase: DragPhase,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Arm on `point` if it is an editable cell. Returns whether it armed.
    pub fn press<E, S, D>(&mut self, point: GridPoint, calendars: &[EntityCalendar<E, S, D>]) -> bool
    where
        E: GridEntity,
        S: DayStatus,
    {
        let editable = calendars
            .get(point.row)
            .map_or(false, |cal| cal.is_editable(point.day_index));
        if editable {
            self.phase = DragPhase::Armed { anchor: point };
        }
        editable
    }

    /// Pointer moved onto `point` with the button held
    ///
    /// Returns true when a preview was (re)computed.
    pub fn enter<E, S, D>(&mut self, point: GridPoint, calendars: &[EntityCalendar<E, S, D>]) -> bool
    where
        E: GridEntity,
        S: DayStatus,
    {
        let anchor = match &self.phase {
            DragPhase::Idle => return false,
            DragPhase::Armed { anchor } => *anchor,
            DragPhase::Dragging { anchor, current, .. } => {
                if *current == point {
                    return false;
                }
                *anchor
            }
        };

        let preview = rectangle_preview(anchor, point, calendars);
        self.phase = DragPhase::Dragging {
            anchor,
            current: point,
            preview,
        };
        true
    }

    /// Finish the gesture wherever the pointer is
    ///
    /// When dragging, clears `selection` first unless `keep_existing`, then
    /// merges the preview and returns the number of cells added. An armed
    /// press that never moved just disarms and returns `None`.
    pub fn release(&mut self, keep_existing: bool, selection: &mut SelectionModel) -> Option<usize> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Dragging { preview, .. } => {
                if !keep_existing {
                    selection.clear();
                }
                let added = selection.merge(&preview);
                debug!(
                    "DRAG: committed {} previewed cells ({} new, keep_existing={})",
                    preview.len(),
                    added,
                    keep_existing
                );
                Some(added)
            }
            _ => None,
        }
    }

    /// Abort without touching any selection. Returns whether anything was
    /// in progress.
    pub fn cancel(&mut self) -> bool {
        let was_active = self.is_active();
        if was_active {
            debug!("DRAG: cancelled");
        }
        self.phase = DragPhase::Idle;
        was_active
    }

    /// Armed or dragging
    pub fn is_active(&self) -> bool {
        !matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    pub fn anchor(&self) -> Option<GridPoint> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Armed { anchor } | DragPhase::Dragging { anchor, .. } => Some(*anchor),
        }
    }

    pub fn preview(&self) -> Option<&EditableCells> {
        match &self.phase {
            DragPhase::Dragging { preview, .. } => Some(preview),
            _ => None,
        }
    }

    pub fn in_preview(&self, key: &CellKey) -> bool {
        self.preview().map_or(false, |p| p.contains(key))
    }
}

/// Editable cells inside the rectangle spanned by `a` and `b`
///
/// Rows or days past the end of the supplied calendars are ignored.
pub fn rectangle_preview<E, S, D>(
    a: GridPoint,
    b: GridPoint,
    calendars: &[EntityCalendar<E, S, D>],
) -> EditableCells
where
    E: GridEntity,
    S: DayStatus,
{
    let (row_lo, row_hi) = (a.row.min(b.row), a.row.max(b.row));
    let (day_lo, day_hi) = (a.day_index.min(b.day_index), a.day_index.max(b.day_index));

    let mut preview = EditableCells::new();
    for calendar in calendars.iter().take(row_hi + 1).skip(row_lo) {
        for day_index in day_lo..=day_hi {
            if calendar.is_editable(day_index) {
                preview.insert_checked(CellKey::new(calendar.entity_id(), day_index));
            }
        }
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day::{CalendarDay, CellStatus};
    use chrono::NaiveDate;

    #[derive(Debug, Clone)]
    struct Row(String);

    impl GridEntity for Row {
        fn entity_id(&self) -> &str {
            &self.0
        }
        fn display_name(&self) -> String {
            self.0.clone()
        }
    }

    /// Rows r0..r3, 10 days each; day 4 is locked everywhere and row 2 also
    /// locks day 1
    fn calendars() -> Vec<EntityCalendar<Row, CellStatus>> {
        (0..4)
            .map(|row| {
                let days = (0..10)
                    .map(|i| {
                        let editable = i != 4 && !(row == 2 && i == 1);
                        CalendarDay {
                            date: NaiveDate::from_ymd_opt(2025, 1, 1 + i as u32).unwrap(),
                            day_of_week: 0,
                            is_weekend: false,
                            is_holiday: false,
                            status: CellStatus::Empty,
                            value: None,
                            is_editable: editable,
                            data: None,
                        }
                    })
                    .collect();
                EntityCalendar::new(Row(format!("r{}", row)), days)
            })
            .collect()
    }

    #[test]
    fn test_press_on_locked_cell_does_not_arm() {
        let cals = calendars();
        let mut drag = DragController::new();
        assert!(!drag.press(GridPoint::new(0, 4), &cals));
        assert!(!drag.is_active());
        assert!(!drag.press(GridPoint::new(9, 0), &cals));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_enter_without_press_is_ignored() {
        let cals = calendars();
        let mut drag = DragController::new();
        assert!(!drag.enter(GridPoint::new(1, 1), &cals));
        assert_eq!(drag.phase(), &DragPhase::Idle);
    }

    #[test]
    fn test_rectangle_selection_on_release() {
        let cals = calendars();
        let mut drag = DragController::new();
        let mut selection = SelectionModel::new();

        assert!(drag.press(GridPoint::new(3, 6), &cals));
        assert!(drag.enter(GridPoint::new(2, 5), &cals));
        assert!(drag.enter(GridPoint::new(1, 0), &cals));
        assert!(drag.is_dragging());

        let added = drag.release(false, &mut selection).unwrap();

        // rows 1..=3 x days 0..=6, minus day 4 on every row and day 1 on row 2
        assert_eq!(added, 3 * 6 - 1);
        for row in 1..=3 {
            for day in 0..=6 {
                let key = CellKey::new(format!("r{}", row), day);
                let expected = day != 4 && !(row == 2 && day == 1);
                assert_eq!(selection.contains(&key), expected, "{}", key);
            }
        }
        assert!(!selection.contains(&CellKey::new("r0", 0)));
        assert!(!selection.contains(&CellKey::new("r1", 7)));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_preview_shrinks_when_pointer_returns() {
        let cals = calendars();
        let mut drag = DragController::new();
        drag.press(GridPoint::new(0, 0), &cals);
        drag.enter(GridPoint::new(1, 3), &cals);
        assert_eq!(drag.preview().map(|p| p.len()), Some(8));

        drag.enter(GridPoint::new(0, 1), &cals);
        assert_eq!(drag.preview().map(|p| p.len()), Some(2));
        assert!(drag.in_preview(&CellKey::new("r0", 1)));
        assert!(!drag.in_preview(&CellKey::new("r1", 1)));
    }

    #[test]
    fn test_release_replaces_or_extends_existing_selection() {
        let cals = calendars();
        let mut selection = SelectionModel::new();
        selection.select("r0", 9, &cals[0].days[9]);

        let mut drag = DragController::new();
        drag.press(GridPoint::new(0, 0), &cals);
        drag.enter(GridPoint::new(0, 1), &cals);
        drag.release(true, &mut selection);
        assert_eq!(selection.len(), 3);

        drag.press(GridPoint::new(1, 0), &cals);
        drag.enter(GridPoint::new(1, 0), &cals);
        drag.release(false, &mut selection);
        assert_eq!(selection.sorted(), vec![CellKey::new("r1", 0)]);
    }

    #[test]
    fn test_release_while_only_armed_is_a_no_op() {
        let cals = calendars();
        let mut selection = SelectionModel::new();
        selection.select("r0", 9, &cals[0].days[9]);

        let mut drag = DragController::new();
        drag.press(GridPoint::new(0, 0), &cals);
        assert_eq!(drag.release(false, &mut selection), None);
        assert_eq!(selection.len(), 1);
        assert!(!drag.is_active());
    }

    #[test]
    fn test_cancel_discards_preview() {
        let cals = calendars();
        let mut selection = SelectionModel::new();
        let mut drag = DragController::new();
        drag.press(GridPoint::new(0, 0), &cals);
        drag.enter(GridPoint::new(3, 9), &cals);

        assert!(drag.cancel());
        assert_eq!(drag.release(false, &mut selection), None);
        assert!(selection.is_empty());
        assert!(!drag.cancel());
    }

    #[test]
    fn test_rectangle_clipped_to_existing_rows() {
        let cals = calendars();
        let preview = rectangle_preview(GridPoint::new(3, 0), GridPoint::new(20, 0), &cals);
        assert_eq!(preview.len(), 1);
        assert!(preview.contains(&CellKey::new("r3", 0)));
    }
}
