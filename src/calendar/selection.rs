//! Sparse multi-cell selection
//!
//! Coordinates are `(entity id, day index)` pairs. The model refuses
//! non-editable cells at insertion time, so it never holds one.

use std::collections::HashSet;
use std::fmt;

use super::day::CalendarDay;

/// Identity of a grid cell within the currently materialized period
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub entity_id: String,
    pub day_index: usize,
}

impl CellKey {
    pub fn new(entity_id: impl Into<String>, day_index: usize) -> Self {
        Self {
            entity_id: entity_id.into(),
            day_index,
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.entity_id, self.day_index)
    }
}

/// Set of cells that were checked as editable when they were inserted
///
/// Only code in this crate can insert, which keeps the editability check in
/// one place (the drag preview builder).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditableCells {
    cells: HashSet<CellKey>,
}

impl EditableCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert_checked(&mut self, key: CellKey) {
        self.cells.insert(key);
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.cells.contains(key)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellKey> {
        self.cells.iter()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionModel {
    cells: HashSet<CellKey>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the cell if selected, otherwise add it when editable
    ///
    /// Returns whether the cell is selected afterwards.
    pub fn toggle<S, D>(&mut self, entity_id: &str, day_index: usize, day: &CalendarDay<S, D>) -> bool {
        let key = CellKey::new(entity_id, day_index);
        if self.cells.remove(&key) {
            return false;
        }
        if day.is_editable {
            self.cells.insert(key);
            true
        } else {
            false
        }
    }

    /// Add one cell if its day is editable
    pub fn select<S, D>(&mut self, entity_id: &str, day_index: usize, day: &CalendarDay<S, D>) -> bool {
        if !day.is_editable {
            return false;
        }
        self.cells.insert(CellKey::new(entity_id, day_index))
    }

    /// Add every editable day of `entity_id` between `from` and `to` inclusive
    ///
    /// `days` is the entity's row. The range is clipped to it and non-editable
    /// days are skipped. Returns the number of cells newly added.
    pub fn extend_range<S, D>(&mut self, entity_id: &str, from: usize, to: usize, days: &[CalendarDay<S, D>]) -> usize {
        let Some(last) = days.len().checked_sub(1) else {
            return 0;
        };
        let lo = from.min(to);
        let hi = from.max(to).min(last);
        if lo > hi {
            return 0;
        }
        let mut added = 0;
        for (index, day) in days[lo..=hi].iter().enumerate() {
            if day.is_editable && self.cells.insert(CellKey::new(entity_id, lo + index)) {
                added += 1;
            }
        }
        added
    }

    /// Merge pre-checked cells, returning how many were new
    pub fn merge(&mut self, cells: &EditableCells) -> usize {
        cells
            .iter()
            .filter(|key| self.cells.insert((*key).clone()))
            .count()
    }

    pub fn remove(&mut self, key: &CellKey) -> bool {
        self.cells.remove(key)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.cells.contains(key)
    }

    /// Selected cells in no particular order
    pub fn entries(&self) -> impl Iterator<Item = &CellKey> {
        self.cells.iter()
    }

    /// Selected cells ordered by entity id, then day index
    pub fn sorted(&self) -> Vec<CellKey> {
        let mut keys: Vec<CellKey> = self.cells.iter().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::day::CellStatus;
    use chrono::NaiveDate;

    fn day(editable: bool) -> CalendarDay<CellStatus> {
        CalendarDay {
            date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
            day_of_week: 1,
            is_weekend: false,
            is_holiday: false,
            status: if editable { CellStatus::Empty } else { CellStatus::Weekend },
            value: None,
            is_editable: editable,
            data: None,
        }
    }

    /// Editable pattern: indices 2 and 5 are locked
    fn row() -> Vec<CalendarDay<CellStatus>> {
        (0..8).map(|i| day(i != 2 && i != 5)).collect()
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut selection = SelectionModel::new();
        assert!(selection.toggle("e1", 3, &day(true)));
        assert!(selection.contains(&CellKey::new("e1", 3)));
        assert!(!selection.toggle("e1", 3, &day(true)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_refuses_locked_day() {
        let mut selection = SelectionModel::new();
        assert!(!selection.toggle("e1", 3, &day(false)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_extend_range_skips_locked_days() {
        let days = row();
        let mut selection = SelectionModel::new();
        let added = selection.extend_range("e1", 6, 1, &days);

        assert_eq!(added, 4);
        for i in 1..=6 {
            let expected = i != 2 && i != 5;
            assert_eq!(selection.contains(&CellKey::new("e1", i)), expected, "index {}", i);
        }
    }

    #[test]
    fn test_extend_range_never_inserts_locked_cells_for_any_range() {
        let days = row();
        for from in 0..10 {
            for to in 0..10 {
                let mut selection = SelectionModel::new();
                selection.extend_range("e1", from, to, &days);
                for key in selection.entries() {
                    assert!(days[key.day_index].is_editable);
                }
            }
        }
    }

    #[test]
    fn test_extend_range_out_of_bounds_is_partial() {
        let days = row();
        let mut selection = SelectionModel::new();
        let added = selection.extend_range("e1", 6, 20, &days);
        assert_eq!(added, 2);
    }

    #[test]
    fn test_extend_range_clips_to_row() {
        let days = row();
        let mut selection = SelectionModel::new();
        assert_eq!(selection.extend_range("e1", 7, usize::MAX, &days), 1);
        assert_eq!(selection.extend_range("e1", 40, 90, &days), 0);

        let empty: Vec<CalendarDay<CellStatus>> = Vec::new();
        assert_eq!(selection.extend_range("e2", 0, 3, &empty), 0);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_extend_range_counts_only_new_cells() {
        let days = row();
        let mut selection = SelectionModel::new();
        selection.select("e1", 0, &days[0]);
        assert_eq!(selection.extend_range("e1", 0, 1, &days), 1);
    }

    #[test]
    fn test_merge_and_clear() {
        let mut preview = EditableCells::new();
        preview.insert_checked(CellKey::new("a", 1));
        preview.insert_checked(CellKey::new("b", 1));

        let mut selection = SelectionModel::new();
        selection.select("a", 1, &day(true));
        assert_eq!(selection.merge(&preview), 1);
        assert_eq!(selection.len(), 2);

        selection.clear();
        assert_eq!(selection.len(), 0);
    }

    #[test]
    fn test_sorted_orders_by_entity_then_day() {
        let mut selection = SelectionModel::new();
        selection.select("b", 0, &day(true));
        selection.select("a", 10, &day(true));
        selection.select("a", 2, &day(true));

        let sorted: Vec<String> = selection.sorted().iter().map(|k| k.to_string()).collect();
        assert_eq!(sorted, vec!["a-2", "a-10", "b-0"]);
    }
}
