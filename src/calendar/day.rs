//! Per-day cell values and per-row calendars
//!
//! Hosts describe each day with their own closed status type and map it onto
//! the grid's generic [`CellStatus`] through [`DayStatus`].

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::date_index::DayFacts;

/// Leave categories shared by the leave and activity-report calendars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveCategory {
    Vacation,
    Rtt,
    SickLeave,
    UnpaidLeave,
    MaternityLeave,
    PaternityLeave,
    Training,
    Other,
}

impl LeaveCategory {
    pub const ALL: [LeaveCategory; 8] = [
        LeaveCategory::Vacation,
        LeaveCategory::Rtt,
        LeaveCategory::SickLeave,
        LeaveCategory::UnpaidLeave,
        LeaveCategory::MaternityLeave,
        LeaveCategory::PaternityLeave,
        LeaveCategory::Training,
        LeaveCategory::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeaveCategory::Vacation => "Paid leave",
            LeaveCategory::Rtt => "RTT",
            LeaveCategory::SickLeave => "Sick leave",
            LeaveCategory::UnpaidLeave => "Unpaid leave",
            LeaveCategory::MaternityLeave => "Maternity leave",
            LeaveCategory::PaternityLeave => "Paternity leave",
            LeaveCategory::Training => "Training",
            LeaveCategory::Other => "Other",
        }
    }
}

/// Generic render status of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStatus {
    Worked,
    Approved,
    Pending,
    Rejected,
    Leave(LeaveCategory),
    Holiday,
    Weekend,
    Empty,
    Partial,
    Full,
}

impl CellStatus {
    /// Stable lowercase tag, e.g. for theme lookups
    pub fn tag(&self) -> &'static str {
        match self {
            CellStatus::Worked => "worked",
            CellStatus::Approved => "approved",
            CellStatus::Pending => "pending",
            CellStatus::Rejected => "rejected",
            CellStatus::Leave(LeaveCategory::Vacation) => "vacation",
            CellStatus::Leave(LeaveCategory::Rtt) => "rtt",
            CellStatus::Leave(LeaveCategory::SickLeave) => "sick_leave",
            CellStatus::Leave(LeaveCategory::UnpaidLeave) => "unpaid_leave",
            CellStatus::Leave(LeaveCategory::MaternityLeave) => "maternity_leave",
            CellStatus::Leave(LeaveCategory::PaternityLeave) => "paternity_leave",
            CellStatus::Leave(LeaveCategory::Training) => "training",
            CellStatus::Leave(LeaveCategory::Other) => "other",
            CellStatus::Holiday => "holiday",
            CellStatus::Weekend => "weekend",
            CellStatus::Empty => "empty",
            CellStatus::Partial => "partial",
            CellStatus::Full => "full",
        }
    }
}

impl fmt::Display for CellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Domain-specific day status that the grid can render
pub trait DayStatus: Clone + fmt::Debug {
    fn cell_status(&self) -> CellStatus;
}

impl DayStatus for CellStatus {
    fn cell_status(&self) -> CellStatus {
        *self
    }
}

/// Optional payload of a day
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DayValue {
    /// Fraction of a worked day (0.5 or 1 in activity reports)
    Days(f32),
    Leave(LeaveCategory),
}

/// Row entity of the grid (an employee in both host screens)
pub trait GridEntity: Clone + fmt::Debug {
    fn entity_id(&self) -> &str;
    fn display_name(&self) -> String;
}

/// One cell's worth of day data
///
/// Rebuilt wholesale with its row whenever the period or the underlying
/// records change; never patched in place.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay<S, D = ()> {
    pub date: NaiveDate,
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub status: S,
    pub value: Option<DayValue>,
    pub is_editable: bool,
    /// Back-reference to the originating record
    pub data: Option<D>,
}

impl<S: DayStatus, D> CalendarDay<S, D> {
    pub fn from_facts(facts: &DayFacts, status: S, is_editable: bool) -> Self {
        Self {
            date: facts.date,
            day_of_week: facts.day_of_week,
            is_weekend: facts.is_weekend,
            is_holiday: facts.is_holiday,
            status,
            value: None,
            is_editable,
            data: None,
        }
    }

    pub fn with_value(mut self, value: Option<DayValue>) -> Self {
        self.value = value;
        self
    }

    pub fn with_data(mut self, data: Option<D>) -> Self {
        self.data = data;
        self
    }

    pub fn cell_status(&self) -> CellStatus {
        self.status.cell_status()
    }
}

/// One row of the grid: an entity and its days for the current period
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCalendar<E, S, D = ()> {
    pub entity: E,
    pub days: Vec<CalendarDay<S, D>>,
}

impl<E: GridEntity, S: DayStatus, D> EntityCalendar<E, S, D> {
    pub fn new(entity: E, days: Vec<CalendarDay<S, D>>) -> Self {
        Self { entity, days }
    }

    pub fn entity_id(&self) -> &str {
        self.entity.entity_id()
    }

    pub fn day(&self, index: usize) -> Option<&CalendarDay<S, D>> {
        self.days.get(index)
    }

    pub fn is_editable(&self, index: usize) -> bool {
        self.day(index).map_or(false, |d| d.is_editable)
    }
}
