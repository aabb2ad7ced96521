/// Mock fixture data for tests, benchmarks and the interactive demo
///
/// Everything here is deterministic: the same year or month always yields
/// the same employees, requests and entries.
use chrono::{Datelike, NaiveDate};

use crate::calendar::date_index::is_weekend;
use crate::calendar::period::days_in_month;
use crate::calendar::{HolidayCalculator, LeaveCategory};
use crate::domain::cra::{CraEntry, CraEntryStatus, CraValue};
use crate::domain::leave::{LeaveRequest, LeaveStatus, LeaveType};
use crate::domain::Employee;

/// First date of the fixture company
const FOUNDED: (i32, u32, u32) = (2018, 3, 1);

pub fn employee(id: &str, first_name: &str, last_name: &str, department: &str, position: &str) -> Employee {
    Employee {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!(
            "{}.{}@example.com",
            first_name.to_lowercase(),
            last_name.to_lowercase()
        ),
        position: position.to_string(),
        department: department.to_string(),
        hire_date: NaiveDate::from_ymd_opt(FOUNDED.0, FOUNDED.1, FOUNDED.2).unwrap_or_default(),
        is_active: true,
    }
}

pub fn leave_request(
    id: &str,
    employee_id: &str,
    leave_type: LeaveType,
    status: LeaveStatus,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> LeaveRequest {
    LeaveRequest {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        leave_type,
        start_date,
        end_date,
        total_days: ((end_date - start_date).num_days() + 1) as f32,
        reason: String::new(),
        status,
        submitted_date: start_date,
        approved_by: None,
        comments: None,
    }
}

pub fn cra_entry(id: &str, employee_id: &str, date: NaiveDate, value: CraValue) -> CraEntry {
    CraEntry {
        id: id.to_string(),
        employee_id: employee_id.to_string(),
        date,
        value,
        notes: None,
        status: CraEntryStatus::Draft,
    }
}

/// The demo staff, ordered by last name
pub fn mock_employees() -> Vec<Employee> {
    vec![
        employee("emp-1", "Camille", "Bernard", "Engineering", "Backend Developer"),
        employee("emp-2", "Hugo", "Petit", "Engineering", "Frontend Developer"),
        employee("emp-3", "Léa", "Durand", "Human Resources", "HR Manager"),
        employee("emp-4", "Lucas", "Leroy", "Finance", "Accountant"),
        employee("emp-5", "Chloé", "Moreau", "Marketing", "Product Marketer"),
        employee("emp-6", "Louis", "Simon", "Sales", "Account Executive"),
        employee("emp-7", "Manon", "Laurent", "Engineering", "QA Engineer"),
        employee("emp-8", "Jules", "Michel", "Legal", "Counsel"),
    ]
}

fn ymd(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Leave requests spread over `year`, a few per employee in every status
pub fn mock_leave_requests(year: i32) -> Vec<LeaveRequest> {
    let mut requests = Vec::new();
    for (i, employee) in mock_employees().iter().enumerate() {
        let month = |offset: usize| ((i + offset) % 12) as u32 + 1;
        let plan = [
            (LeaveType::Vacation, LeaveStatus::Approved, month(0), 10, 14),
            (LeaveType::Personal, LeaveStatus::Approved, month(2), 6, 6),
            (LeaveType::Vacation, LeaveStatus::Pending, month(5), 3, 5),
            (LeaveType::Sick, LeaveStatus::Pending, month(7), 20, 21),
            (LeaveType::Unpaid, LeaveStatus::Rejected, month(9), 15, 16),
            (LeaveType::Vacation, LeaveStatus::Cancelled, month(10), 24, 25),
        ];
        for (n, (leave_type, status, month, from, to)) in plan.into_iter().enumerate() {
            if let (Some(start), Some(end)) = (ymd(year, month, from), ymd(year, month, to)) {
                let id = format!("lr-{}-{}-{}", year, i + 1, n + 1);
                let mut request = leave_request(&id, &employee.id, leave_type, status, start, end);
                request.reason = leave_type.label().to_string();
                if status == LeaveStatus::Approved {
                    request.approved_by = Some("emp-3".to_string());
                }
                requests.push(request);
            }
        }
    }
    requests
}

/// Activity entries for the first half of a month
///
/// Working days up to the 15th are filled with whole days, a half day every
/// Wednesday and one leave day per employee; the rest of the month is left
/// empty.
pub fn mock_cra_entries(year: i32, month: u32) -> Vec<CraEntry> {
    let mut holidays = HolidayCalculator::new();
    let last = days_in_month(year, month).unwrap_or(0).min(15);
    let mut entries = Vec::new();

    for (i, employee) in mock_employees().iter().enumerate() {
        let leave_day = 2 + (i as u32 % 10);
        for day in 1..=last {
            let Some(date) = ymd(year, month, day) else {
                continue;
            };
            if is_weekend(date) || holidays.is_holiday(date) {
                continue;
            }
            let value = if day == leave_day {
                CraValue::Leave(LeaveCategory::ALL[i % LeaveCategory::ALL.len()])
            } else if date.weekday() == chrono::Weekday::Wed {
                CraValue::Days(0.5)
            } else {
                CraValue::Days(1.0)
            };
            let id = format!("cra-{}-{:02}-{}-{:02}", year, month, i + 1, day);
            entries.push(cra_entry(&id, &employee.id, date, value));
        }
    }
    entries
}
