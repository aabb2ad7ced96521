//! Monthly activity report (CRA) calendar
//!
//! Each working day holds either a worked fraction (0.5 or 1) or a leave
//! category. Weekends and holidays are locked.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calendar::{
    CalendarDay, CalendarGridController, CellRef, CellStatus, DayFacts, DayStatus, DayValue, EntityCalendar,
    GridLayout, GridOptions, LeaveCategory, Period, ViewMode,
};

use super::Employee;

pub const HALF_DAY: f32 = 0.5;
pub const FULL_DAY: f32 = 1.0;

/// Content of an activity-report entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CraValue {
    Days(f32),
    Leave(LeaveCategory),
}

impl CraValue {
    pub fn is_leave(&self) -> bool {
        matches!(self, CraValue::Leave(_))
    }

    pub fn to_day_value(self) -> DayValue {
        match self {
            CraValue::Days(days) => DayValue::Days(days),
            CraValue::Leave(category) => DayValue::Leave(category),
        }
    }
}

impl fmt::Display for CraValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CraValue::Days(days) => write!(f, "{}", days),
            CraValue::Leave(category) => f.write_str(category.label()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CraEntryStatus {
    #[default]
    Draft,
    Submitted,
    Validated,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CraEntry {
    /// Empty until the store assigns one
    pub id: String,
    pub employee_id: String,
    pub date: NaiveDate,
    pub value: CraValue,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: CraEntryStatus,
}

impl CraEntry {
    pub fn is_leave_type(&self) -> bool {
        self.value.is_leave()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CraValidationError {
    #[error("worked fraction {0} is outside 0..=1")]
    OutOfRange(f32),

    #[error("half days are only allowed Monday to Friday ({0})")]
    HalfDayOnWeekend(NaiveDate),
}

/// Check an entry before it is saved
pub fn validate_entry(entry: &CraEntry) -> Result<(), CraValidationError> {
    if let CraValue::Days(days) = entry.value {
        if !(0.0..=FULL_DAY).contains(&days) {
            return Err(CraValidationError::OutOfRange(days));
        }
        if days == HALF_DAY && entry.date.weekday().number_from_monday() > 5 {
            return Err(CraValidationError::HalfDayOnWeekend(entry.date));
        }
    }
    Ok(())
}

/// Closed status space of a CRA day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CraDayStatus {
    Empty,
    Partial,
    Full,
    Leave(LeaveCategory),
    Holiday,
    Weekend,
}

impl DayStatus for CraDayStatus {
    fn cell_status(&self) -> CellStatus {
        match self {
            CraDayStatus::Empty => CellStatus::Empty,
            CraDayStatus::Partial => CellStatus::Partial,
            CraDayStatus::Full => CellStatus::Full,
            CraDayStatus::Leave(category) => CellStatus::Leave(*category),
            CraDayStatus::Holiday => CellStatus::Holiday,
            CraDayStatus::Weekend => CellStatus::Weekend,
        }
    }
}

pub type CraDay = CalendarDay<CraDayStatus, CraEntry>;
pub type CraCalendar = EntityCalendar<Employee, CraDayStatus, CraEntry>;
pub type CraCell = CellRef<Employee, CraDayStatus, CraEntry>;
pub type CraGrid = CalendarGridController<Employee, CraDayStatus, CraEntry>;

/// Month view with cell editing
pub fn grid_options(layout: GridLayout, scroll_step: f64) -> GridOptions {
    GridOptions {
        view_mode: ViewMode::Month,
        allow_multi_select: true,
        allow_drag_select: true,
        allow_cell_editing: true,
        layout,
        scroll_step,
    }
}

pub fn day_status(facts: &DayFacts, entry: Option<&CraEntry>) -> CraDayStatus {
    if facts.is_weekend {
        return CraDayStatus::Weekend;
    }
    if facts.is_holiday {
        return CraDayStatus::Holiday;
    }
    match entry.map(|e| e.value) {
        Some(CraValue::Leave(category)) => CraDayStatus::Leave(category),
        Some(CraValue::Days(days)) if days == HALF_DAY => CraDayStatus::Partial,
        Some(CraValue::Days(days)) if days == FULL_DAY => CraDayStatus::Full,
        Some(CraValue::Days(_)) | None => CraDayStatus::Empty,
    }
}

/// One row per employee; entries of other employees or dates are ignored
pub fn build_calendars(employees: &[Employee], entries: &[CraEntry], facts: &[DayFacts]) -> Vec<CraCalendar> {
    let by_key: HashMap<(&str, NaiveDate), &CraEntry> = entries
        .iter()
        .map(|e| ((e.employee_id.as_str(), e.date), e))
        .collect();

    employees
        .iter()
        .map(|employee| {
            let days = facts
                .iter()
                .map(|f| {
                    let entry = by_key.get(&(employee.id.as_str(), f.date)).copied();
                    let status = day_status(f, entry);
                    let value = match status {
                        CraDayStatus::Weekend | CraDayStatus::Holiday => None,
                        _ => entry.map(|e| e.value.to_day_value()),
                    };
                    CalendarDay::from_facts(f, status, f.is_working_day())
                        .with_value(value)
                        .with_data(entry.cloned())
                })
                .collect();
            EntityCalendar::new(employee.clone(), days)
        })
        .collect()
}

/// Quick-entry cycle: empty → 1 → 0.5 → empty (leave goes to 1)
pub fn next_quick_value(current: Option<CraValue>) -> Option<CraValue> {
    match current {
        None => Some(CraValue::Days(FULL_DAY)),
        Some(CraValue::Days(days)) if days == FULL_DAY => Some(CraValue::Days(HALF_DAY)),
        Some(CraValue::Days(days)) if days == HALF_DAY => None,
        Some(CraValue::Days(_)) | Some(CraValue::Leave(_)) => Some(CraValue::Days(FULL_DAY)),
    }
}

/// Store operation produced by an edit
#[derive(Debug, Clone, PartialEq)]
pub enum CraChange {
    Save(CraEntry),
    Delete(String),
}

/// Change that sets `cell` to `value`, if any
///
/// Locked cells never produce a change. Clearing a cell that has no entry is
/// a no-op.
pub fn change_for(cell: &CraCell, value: Option<CraValue>) -> Option<CraChange> {
    if !cell.day.is_editable {
        return None;
    }
    let existing = cell.day.data.as_ref();
    match (value, existing) {
        (Some(value), Some(entry)) => Some(CraChange::Save(CraEntry {
            value,
            status: CraEntryStatus::Draft,
            ..entry.clone()
        })),
        (Some(value), None) => Some(CraChange::Save(CraEntry {
            id: String::new(),
            employee_id: cell.entity.id.clone(),
            date: cell.day.date,
            value,
            notes: None,
            status: CraEntryStatus::Draft,
        })),
        (None, Some(entry)) if !entry.id.is_empty() => Some(CraChange::Delete(entry.id.clone())),
        (None, _) => None,
    }
}

/// Advance a single cell through the quick-entry cycle
pub fn quick_edit(cell: &CraCell) -> Option<CraChange> {
    let current = cell.day.data.as_ref().map(|e| e.value);
    change_for(cell, next_quick_value(current))
}

/// Set every editable cell of a batch to `value`
pub fn bulk_fill(cells: &[CraCell], value: Option<CraValue>) -> Vec<CraChange> {
    cells.iter().filter_map(|cell| change_for(cell, value)).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct CraSummary {
    pub employee_id: String,
    pub year: i32,
    pub month: u32,
    /// Sum of worked fractions (a half day counts 0.5)
    pub worked_days: f32,
    pub leaves_by_category: BTreeMap<LeaveCategory, usize>,
    /// Weekdays that are not public holidays
    pub planned_days: usize,
}

impl CraSummary {
    pub fn leave_days(&self) -> usize {
        self.leaves_by_category.values().sum()
    }

    /// Working days with nothing recorded yet
    pub fn missing_days(&self) -> f32 {
        (self.planned_days as f32 - self.worked_days - self.leave_days() as f32).max(0.0)
    }
}

/// Monthly totals for one employee over the period's day facts
pub fn summarize(employee_id: &str, period: Period, entries: &[CraEntry], facts: &[DayFacts]) -> CraSummary {
    let own = entries
        .iter()
        .filter(|e| e.employee_id == employee_id && period.contains(e.date));

    let mut worked_days = 0.0;
    let mut leaves_by_category = BTreeMap::new();
    for entry in own {
        match entry.value {
            CraValue::Days(days) if days > 0.0 => worked_days += days,
            CraValue::Days(_) => {}
            CraValue::Leave(category) => *leaves_by_category.entry(category).or_insert(0) += 1,
        }
    }

    CraSummary {
        employee_id: employee_id.to_string(),
        year: period.year(),
        month: period.month().unwrap_or(1),
        worked_days,
        leaves_by_category,
        planned_days: facts.iter().filter(|f| f.is_working_day()).count(),
    }
}
