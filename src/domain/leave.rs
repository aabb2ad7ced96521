//! Leave-request calendar (year view)
//!
//! Days map to worked / weekend / holiday, or to the status of the leave
//! request covering them. Approved personal leave renders as RTT.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{
    CalendarDay, CalendarGridController, CellRef, CellStatus, DayFacts, DayStatus, DayValue, EntityCalendar,
    GridLayout, GridOptions, LeaveCategory, ViewMode,
};

use super::Employee;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Vacation,
    Sick,
    Personal,
    Maternity,
    Paternity,
    Bereavement,
    Unpaid,
}

impl LeaveType {
    pub const ALL: [LeaveType; 7] = [
        LeaveType::Vacation,
        LeaveType::Sick,
        LeaveType::Personal,
        LeaveType::Maternity,
        LeaveType::Paternity,
        LeaveType::Bereavement,
        LeaveType::Unpaid,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            LeaveType::Vacation => "Paid leave",
            LeaveType::Sick => "Sick leave",
            LeaveType::Personal => "Personal leave",
            LeaveType::Maternity => "Maternity leave",
            LeaveType::Paternity => "Paternity leave",
            LeaveType::Bereavement => "Bereavement leave",
            LeaveType::Unpaid => "Unpaid leave",
        }
    }

    pub fn category(&self) -> LeaveCategory {
        match self {
            LeaveType::Vacation => LeaveCategory::Vacation,
            LeaveType::Sick => LeaveCategory::SickLeave,
            LeaveType::Personal => LeaveCategory::Rtt,
            LeaveType::Maternity => LeaveCategory::MaternityLeave,
            LeaveType::Paternity => LeaveCategory::PaternityLeave,
            LeaveType::Bereavement => LeaveCategory::Other,
            LeaveType::Unpaid => LeaveCategory::UnpaidLeave,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::Approved => "Approved",
            LeaveStatus::Rejected => "Rejected",
            LeaveStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub id: String,
    pub employee_id: String,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: f32,
    pub reason: String,
    pub status: LeaveStatus,
    pub submitted_date: NaiveDate,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
}

impl LeaveRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// Closed status space of a leave-calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveDayStatus {
    Worked,
    Weekend,
    Holiday,
    Approved,
    Rtt,
    Pending,
    Rejected,
}

impl LeaveDayStatus {
    /// Statuses that come from a leave request
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            LeaveDayStatus::Approved | LeaveDayStatus::Rtt | LeaveDayStatus::Pending | LeaveDayStatus::Rejected
        )
    }
}

impl DayStatus for LeaveDayStatus {
    fn cell_status(&self) -> CellStatus {
        match self {
            LeaveDayStatus::Worked => CellStatus::Worked,
            LeaveDayStatus::Weekend => CellStatus::Weekend,
            LeaveDayStatus::Holiday => CellStatus::Holiday,
            LeaveDayStatus::Approved => CellStatus::Approved,
            LeaveDayStatus::Rtt => CellStatus::Leave(LeaveCategory::Rtt),
            LeaveDayStatus::Pending => CellStatus::Pending,
            LeaveDayStatus::Rejected => CellStatus::Rejected,
        }
    }
}

impl fmt::Display for LeaveDayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cell_status().tag())
    }
}

pub type LeaveDay = CalendarDay<LeaveDayStatus, LeaveRequest>;
pub type LeaveCalendar = EntityCalendar<Employee, LeaveDayStatus, LeaveRequest>;
pub type LeaveCell = CellRef<Employee, LeaveDayStatus, LeaveRequest>;
pub type LeaveGrid = CalendarGridController<Employee, LeaveDayStatus, LeaveRequest>;

/// Year view with multi and drag selection, no cell editing
pub fn grid_options(layout: GridLayout, scroll_step: f64) -> GridOptions {
    GridOptions {
        view_mode: ViewMode::Year,
        allow_multi_select: true,
        allow_drag_select: true,
        allow_cell_editing: false,
        layout,
        scroll_step,
    }
}

/// Weekend beats holiday beats request; cancelled requests leave the day worked
pub fn day_status(facts: &DayFacts, request: Option<&LeaveRequest>) -> LeaveDayStatus {
    if facts.is_weekend {
        return LeaveDayStatus::Weekend;
    }
    if facts.is_holiday {
        return LeaveDayStatus::Holiday;
    }
    match request.map(|r| (r.status, r.leave_type)) {
        Some((LeaveStatus::Approved, LeaveType::Personal)) => LeaveDayStatus::Rtt,
        Some((LeaveStatus::Approved, _)) => LeaveDayStatus::Approved,
        Some((LeaveStatus::Pending, _)) => LeaveDayStatus::Pending,
        Some((LeaveStatus::Rejected, _)) => LeaveDayStatus::Rejected,
        Some((LeaveStatus::Cancelled, _)) | None => LeaveDayStatus::Worked,
    }
}

/// One row per employee over the given day facts
///
/// The first request covering a day is attached to it, even on weekends.
pub fn build_calendars(employees: &[Employee], requests: &[LeaveRequest], facts: &[DayFacts]) -> Vec<LeaveCalendar> {
    let mut by_employee: HashMap<&str, Vec<&LeaveRequest>> = HashMap::new();
    for request in requests {
        by_employee.entry(request.employee_id.as_str()).or_default().push(request);
    }

    employees
        .iter()
        .map(|employee| {
            let own = by_employee.get(employee.id.as_str());
            let days = facts
                .iter()
                .map(|f| {
                    let request = own.and_then(|list| list.iter().find(|r| r.covers(f.date)).copied());
                    let status = day_status(f, request);
                    let value = status
                        .is_request()
                        .then(|| request.map(|r| DayValue::Leave(r.leave_type.category())))
                        .flatten();
                    CalendarDay::from_facts(f, status, f.is_working_day())
                        .with_value(value)
                        .with_data(request.cloned())
                })
                .collect();
            EntityCalendar::new(employee.clone(), days)
        })
        .collect()
}

/// What a single click on a leave cell should open
#[derive(Debug, Clone, PartialEq)]
pub enum ClickIntent {
    /// Show an existing request
    OpenRequest(LeaveRequest),
    /// Start a one-day request on a worked day
    DraftRequest(LeaveRequest),
    Nothing,
}

pub const DRAFT_REQUEST_ID: &str = "temp";

pub fn click_intent(cell: &LeaveCell, today: NaiveDate) -> ClickIntent {
    match (&cell.day.data, cell.day.status) {
        (Some(request), status) if status.is_request() => ClickIntent::OpenRequest(request.clone()),
        (_, LeaveDayStatus::Worked) => ClickIntent::DraftRequest(LeaveRequest {
            id: DRAFT_REQUEST_ID.to_string(),
            employee_id: cell.entity.id.clone(),
            leave_type: LeaveType::Vacation,
            start_date: cell.day.date,
            end_date: cell.day.date,
            total_days: 1.0,
            reason: String::new(),
            status: LeaveStatus::Pending,
            submitted_date: today,
            approved_by: None,
            comments: None,
        }),
        _ => ClickIntent::Nothing,
    }
}

/// Bulk operation applicable to a whole batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkAction {
    /// Every cell is pending: approve or reject
    Review,
    /// Every cell is approved leave or RTT
    Modify,
    /// Every cell is a plain worked day
    Assign,
}

impl BulkAction {
    pub fn label(&self) -> &'static str {
        match self {
            BulkAction::Review => "approve / reject",
            BulkAction::Modify => "modify",
            BulkAction::Assign => "assign leave",
        }
    }
}

/// Mixed batches get no bulk action
pub fn analyze_bulk(cells: &[LeaveCell]) -> Option<BulkAction> {
    if cells.is_empty() {
        return None;
    }
    let all = |pred: fn(LeaveDayStatus) -> bool| cells.iter().all(|c| pred(c.day.status));

    if all(|s| s == LeaveDayStatus::Pending) {
        Some(BulkAction::Review)
    } else if all(|s| matches!(s, LeaveDayStatus::Approved | LeaveDayStatus::Rtt)) {
        Some(BulkAction::Modify)
    } else if all(|s| s == LeaveDayStatus::Worked) {
        Some(BulkAction::Assign)
    } else {
        None
    }
}

pub fn status_count(cells: &[LeaveCell], status: LeaveDayStatus) -> usize {
    cells.iter().filter(|c| c.day.status == status).count()
}

/// Distinct requests behind the cells with `status`, in first-seen order
pub fn requests_with_status(cells: &[LeaveCell], status: LeaveDayStatus) -> Vec<LeaveRequest> {
    let mut seen = HashSet::new();
    cells
        .iter()
        .filter(|c| c.day.status == status)
        .filter_map(|c| c.day.data.as_ref())
        .filter(|r| seen.insert(r.id.clone()))
        .cloned()
        .collect()
}

/// Earliest and latest selected dates
pub fn date_range(cells: &[LeaveCell]) -> Option<(NaiveDate, NaiveDate)> {
    let first = cells.iter().map(|c| c.day.date).min()?;
    let last = cells.iter().map(|c| c.day.date).max()?;
    Some((first, last))
}

pub fn date_range_text(cells: &[LeaveCell]) -> String {
    match date_range(cells) {
        None => "No date selected".to_string(),
        Some((first, last)) if first == last => format!("On {}", first.format("%d/%m/%Y")),
        Some((first, last)) => format!("From {} to {}", first.format("%d/%m/%Y"), last.format("%d/%m/%Y")),
    }
}

/// New requests for the worked days of a batch, one per employee
///
/// Each request spans that employee's own first and last selected day and
/// counts only the selected worked days.
pub fn assignment_requests(
    cells: &[LeaveCell],
    leave_type: LeaveType,
    status: LeaveStatus,
    reason: &str,
    today: NaiveDate,
) -> Vec<LeaveRequest> {
    let mut groups: BTreeMap<&str, Vec<NaiveDate>> = BTreeMap::new();
    for cell in cells.iter().filter(|c| c.day.status == LeaveDayStatus::Worked) {
        groups.entry(cell.entity.id.as_str()).or_default().push(cell.day.date);
    }

    groups
        .into_iter()
        .filter_map(|(employee_id, dates)| {
            let start = *dates.iter().min()?;
            let end = *dates.iter().max()?;
            Some(LeaveRequest {
                id: String::new(),
                employee_id: employee_id.to_string(),
                leave_type,
                start_date: start,
                end_date: end,
                total_days: dates.len() as f32,
                reason: reason.to_string(),
                status,
                submitted_date: today,
                approved_by: None,
                comments: None,
            })
        })
        .collect()
}

/// Row filter of the leave screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeaveFilter {
    pub search: String,
    pub department: Option<String>,
    pub employee_id: Option<String>,
    pub leave_type: Option<LeaveType>,
    pub status: Option<LeaveStatus>,
}

impl LeaveFilter {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.department.is_none()
            && self.employee_id.is_none()
            && self.leave_type.is_none()
            && self.status.is_none()
    }

    pub fn matches(&self, calendar: &LeaveCalendar) -> bool {
        let employee = &calendar.entity;
        if !employee.matches_search(&self.search) {
            return false;
        }
        if self.department.as_ref().map_or(false, |d| *d != employee.department) {
            return false;
        }
        if self.employee_id.as_ref().map_or(false, |id| *id != employee.id) {
            return false;
        }
        let requests = || calendar.days.iter().filter_map(|d| d.data.as_ref());
        if let Some(leave_type) = self.leave_type {
            if !requests().any(|r| r.leave_type == leave_type) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if !requests().any(|r| r.status == status) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, calendars: Vec<LeaveCalendar>) -> Vec<LeaveCalendar> {
        if self.is_empty() {
            return calendars;
        }
        calendars.into_iter().filter(|c| self.matches(c)).collect()
    }
}

/// Departments present in `employees`, sorted and deduplicated
pub fn departments(employees: &[Employee]) -> Vec<String> {
    let mut list: Vec<String> = employees.iter().map(|e| e.department.clone()).collect();
    list.sort();
    list.dedup();
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{DaySequence, HolidayCalculator, Period};
    use crate::fixtures;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    fn may_facts() -> Vec<DayFacts> {
        let mut holidays = HolidayCalculator::new();
        DaySequence::build(Period::Month { year: 2025, month: 5 }).facts(&mut holidays)
    }

    fn request(id: &str, employee: &str, kind: LeaveType, status: LeaveStatus, from: NaiveDate, to: NaiveDate) -> LeaveRequest {
        fixtures::leave_request(id, employee, kind, status, from, to)
    }

    fn may_calendar() -> LeaveCalendar {
        let employees = vec![fixtures::employee("e1", "Marie", "Dubois", "Engineering", "Developer")];
        let requests = vec![
            // Fri 2 .. Tue 6 crosses a weekend
            request("r1", "e1", LeaveType::Vacation, LeaveStatus::Approved, date(5, 2), date(5, 6)),
            request("r2", "e1", LeaveType::Personal, LeaveStatus::Approved, date(5, 12), date(5, 12)),
            request("r3", "e1", LeaveType::Sick, LeaveStatus::Pending, date(5, 13), date(5, 14)),
            request("r4", "e1", LeaveType::Vacation, LeaveStatus::Rejected, date(5, 15), date(5, 15)),
            request("r5", "e1", LeaveType::Vacation, LeaveStatus::Cancelled, date(5, 16), date(5, 16)),
            request("x1", "other", LeaveType::Vacation, LeaveStatus::Approved, date(5, 19), date(5, 19)),
        ];
        build_calendars(&employees, &requests, &may_facts()).remove(0)
    }

    fn cells(calendar: &LeaveCalendar, indices: &[usize]) -> Vec<LeaveCell> {
        indices
            .iter()
            .map(|i| CellRef {
                entity: calendar.entity.clone(),
                day: calendar.days[*i].clone(),
                day_index: *i,
            })
            .collect()
    }

    #[test]
    fn test_status_mapping() {
        let cal = may_calendar();
        let status = |d: u32| cal.days[(d - 1) as usize].status;

        assert_eq!(status(1), LeaveDayStatus::Holiday);
        assert_eq!(status(2), LeaveDayStatus::Approved);
        assert_eq!(status(3), LeaveDayStatus::Weekend);
        assert_eq!(status(5), LeaveDayStatus::Approved);
        assert_eq!(status(7), LeaveDayStatus::Worked);
        assert_eq!(status(12), LeaveDayStatus::Rtt);
        assert_eq!(status(13), LeaveDayStatus::Pending);
        assert_eq!(status(15), LeaveDayStatus::Rejected);
        assert_eq!(status(16), LeaveDayStatus::Worked);
        assert_eq!(status(19), LeaveDayStatus::Worked);
    }

    #[test]
    fn test_editability_and_payload() {
        let cal = may_calendar();
        assert!(!cal.days[0].is_editable);
        assert!(!cal.days[2].is_editable);
        assert!(cal.days[1].is_editable);

        // Weekend inside a request keeps the back-reference but no value
        assert_eq!(cal.days[2].data.as_ref().map(|r| r.id.as_str()), Some("r1"));
        assert_eq!(cal.days[2].value, None);
        assert_eq!(cal.days[11].value, Some(DayValue::Leave(LeaveCategory::Rtt)));
        assert_eq!(cal.days[11].cell_status(), CellStatus::Leave(LeaveCategory::Rtt));
    }

    #[test]
    fn test_click_intent() {
        let cal = may_calendar();
        let today = date(5, 20);

        match click_intent(&cells(&cal, &[12])[0], today) {
            ClickIntent::OpenRequest(r) => assert_eq!(r.id, "r3"),
            other => panic!("unexpected {:?}", other),
        }
        match click_intent(&cells(&cal, &[6])[0], today) {
            ClickIntent::DraftRequest(r) => {
                assert_eq!(r.id, DRAFT_REQUEST_ID);
                assert_eq!(r.start_date, date(5, 7));
                assert_eq!(r.end_date, date(5, 7));
                assert_eq!(r.status, LeaveStatus::Pending);
                assert_eq!(r.employee_id, "e1");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(click_intent(&cells(&cal, &[2])[0], today), ClickIntent::Nothing);
    }

    #[test]
    fn test_analyze_bulk() {
        let cal = may_calendar();
        assert_eq!(analyze_bulk(&cells(&cal, &[12, 13])), Some(BulkAction::Review));
        assert_eq!(analyze_bulk(&cells(&cal, &[1, 4, 11])), Some(BulkAction::Modify));
        assert_eq!(analyze_bulk(&cells(&cal, &[6, 8, 15])), Some(BulkAction::Assign));
        assert_eq!(analyze_bulk(&cells(&cal, &[6, 12])), None);
        assert_eq!(analyze_bulk(&[]), None);
    }

    #[test]
    fn test_counts_and_distinct_requests() {
        let cal = may_calendar();
        let batch = cells(&cal, &[1, 4, 5, 12, 13]);
        assert_eq!(status_count(&batch, LeaveDayStatus::Approved), 3);
        assert_eq!(status_count(&batch, LeaveDayStatus::Pending), 2);

        let approved = requests_with_status(&batch, LeaveDayStatus::Approved);
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, "r1");
    }

    #[test]
    fn test_date_range_text() {
        let cal = may_calendar();
        assert_eq!(date_range_text(&[]), "No date selected");
        assert_eq!(date_range_text(&cells(&cal, &[6])), "On 07/05/2025");
        assert_eq!(
            date_range_text(&cells(&cal, &[20, 6, 8])),
            "From 07/05/2025 to 21/05/2025"
        );
    }

    #[test]
    fn test_assignment_requests_group_per_employee() {
        let cal = may_calendar();
        let mut batch = cells(&cal, &[6, 8, 12]);
        let mut other = cells(&cal, &[20]);
        other[0].entity.id = "e2".to_string();
        batch.append(&mut other);

        let created = assignment_requests(&batch, LeaveType::Vacation, LeaveStatus::Approved, "team offsite", date(5, 1));
        assert_eq!(created.len(), 2);
        assert_eq!(created[0].employee_id, "e1");
        assert_eq!(created[0].start_date, date(5, 7));
        assert_eq!(created[0].end_date, date(5, 9));
        assert_eq!(created[0].total_days, 2.0);
        assert_eq!(created[1].employee_id, "e2");
        assert_eq!(created[1].total_days, 1.0);
    }

    #[test]
    fn test_filter() {
        let employees = vec![
            fixtures::employee("e1", "Marie", "Dubois", "Engineering", "Developer"),
            fixtures::employee("e2", "Luc", "Martin", "Finance", "Analyst"),
        ];
        let requests = vec![request("r1", "e2", LeaveType::Sick, LeaveStatus::Pending, date(5, 5), date(5, 6))];
        let calendars = build_calendars(&employees, &requests, &may_facts());

        let by_text = LeaveFilter {
            search: "dubois".into(),
            ..LeaveFilter::default()
        };
        assert_eq!(by_text.apply(calendars.clone()).len(), 1);

        let by_status = LeaveFilter {
            status: Some(LeaveStatus::Pending),
            ..LeaveFilter::default()
        };
        let kept = by_status.apply(calendars.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].entity.id, "e2");

        let by_type = LeaveFilter {
            department: Some("Finance".into()),
            leave_type: Some(LeaveType::Vacation),
            ..LeaveFilter::default()
        };
        assert!(by_type.apply(calendars.clone()).is_empty());

        assert_eq!(LeaveFilter::default().apply(calendars).len(), 2);
        assert_eq!(departments(&employees), vec!["Engineering", "Finance"]);
    }
}
