/// Trait for providing HR data, abstracting over storage backends and fixtures
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Datelike;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::domain::cra::{validate_entry, CraEntry, CraValidationError};
use crate::domain::leave::{LeaveRequest, LeaveStatus};
use crate::domain::Employee;
use crate::fixtures;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("leave request '{0}' is no longer pending")]
    NotPending(String),

    #[error("invalid activity entry: {0}")]
    InvalidEntry(#[from] CraValidationError),

    #[error("invalid leave request: {0}")]
    InvalidRequest(String),
}

/// Data source for the calendar screens
#[async_trait]
pub trait CalendarDataProvider: Send + Sync {
    /// Active employees, ordered by last name
    async fn employees(&self) -> Result<Vec<Employee>, ProviderError>;

    /// Leave requests overlapping `year`
    async fn leave_requests(&self, year: i32) -> Result<Vec<LeaveRequest>, ProviderError>;

    /// Activity entries for one month, for one employee or for everyone
    async fn cra_entries(
        &self,
        employee_id: Option<&str>,
        year: i32,
        month: u32,
    ) -> Result<Vec<CraEntry>, ProviderError>;

    /// Insert or replace an entry; an empty id gets a fresh one
    async fn save_cra_entry(&self, entry: CraEntry) -> Result<CraEntry, ProviderError>;

    async fn delete_cra_entry(&self, id: &str) -> Result<(), ProviderError>;

    async fn approve_leave_request(&self, id: &str, approver: &str) -> Result<LeaveRequest, ProviderError>;

    async fn reject_leave_request(&self, id: &str, comments: &str) -> Result<LeaveRequest, ProviderError>;

    /// Store a new request; the draft id is replaced
    async fn create_leave_request(&self, request: LeaveRequest) -> Result<LeaveRequest, ProviderError>;
}

#[derive(Debug, Default)]
struct Store {
    employees: Vec<Employee>,
    leave_requests: Vec<LeaveRequest>,
    cra_entries: Vec<CraEntry>,
    seeded_years: Vec<i32>,
    seeded_months: Vec<(i32, u32)>,
}

/// In-memory provider seeded lazily from the fixtures
#[derive(Debug)]
pub struct FixtureProvider {
    store: RwLock<Store>,
    next_id: AtomicU64,
}

impl Default for FixtureProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureProvider {
    pub fn new() -> Self {
        info!("Creating FixtureProvider");
        Self {
            store: RwLock::new(Store {
                employees: fixtures::mock_employees(),
                ..Store::default()
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// A provider with no seeded data, for tests
    pub fn empty() -> Self {
        Self {
            store: RwLock::new(Store::default()),
            next_id: AtomicU64::new(1),
        }
    }

    pub async fn with_employees(self, employees: Vec<Employee>) -> Self {
        self.store.write().await.employees = employees;
        self
    }

    fn fresh_id(&self, prefix: &str) -> String {
        format!("{}-new-{}", prefix, self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn seed_year(&self, year: i32, store: &mut Store) {
        if store.seeded_years.contains(&year) || store.employees.is_empty() {
            return;
        }
        debug!("PROVIDER: Seeding leave requests for {}", year);
        store.leave_requests.extend(fixtures::mock_leave_requests(year));
        store.seeded_years.push(year);
    }

    fn seed_month(&self, year: i32, month: u32, store: &mut Store) {
        if store.seeded_months.contains(&(year, month)) || store.employees.is_empty() {
            return;
        }
        debug!("PROVIDER: Seeding activity entries for {}-{:02}", year, month);
        store.cra_entries.extend(fixtures::mock_cra_entries(year, month));
        store.seeded_months.push((year, month));
    }

    async fn update_pending<F>(&self, id: &str, apply: F) -> Result<LeaveRequest, ProviderError>
    where
        F: FnOnce(&mut LeaveRequest) + Send,
    {
        let mut store = self.store.write().await;
        let request = store
            .leave_requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ProviderError::NotFound {
                kind: "leave request",
                id: id.to_string(),
            })?;
        if request.status != LeaveStatus::Pending {
            return Err(ProviderError::NotPending(id.to_string()));
        }
        apply(request);
        Ok(request.clone())
    }
}

#[async_trait]
impl CalendarDataProvider for FixtureProvider {
    async fn employees(&self) -> Result<Vec<Employee>, ProviderError> {
        let store = self.store.read().await;
        let mut employees: Vec<Employee> = store.employees.iter().filter(|e| e.is_active).cloned().collect();
        employees.sort_by(|a, b| a.last_name.cmp(&b.last_name).then_with(|| a.first_name.cmp(&b.first_name)));
        Ok(employees)
    }

    async fn leave_requests(&self, year: i32) -> Result<Vec<LeaveRequest>, ProviderError> {
        let mut store = self.store.write().await;
        self.seed_year(year, &mut store);
        Ok(store
            .leave_requests
            .iter()
            .filter(|r| r.start_date.year() <= year && r.end_date.year() >= year)
            .cloned()
            .collect())
    }

    async fn cra_entries(
        &self,
        employee_id: Option<&str>,
        year: i32,
        month: u32,
    ) -> Result<Vec<CraEntry>, ProviderError> {
        let mut store = self.store.write().await;
        self.seed_month(year, month, &mut store);
        let mut entries: Vec<CraEntry> = store
            .cra_entries
            .iter()
            .filter(|e| e.date.year() == year && e.date.month() == month)
            .filter(|e| employee_id.map_or(true, |id| e.employee_id == id))
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.employee_id.cmp(&b.employee_id).then(a.date.cmp(&b.date)));
        Ok(entries)
    }

    async fn save_cra_entry(&self, mut entry: CraEntry) -> Result<CraEntry, ProviderError> {
        validate_entry(&entry)?;
        let mut store = self.store.write().await;
        self.seed_month(entry.date.year(), entry.date.month(), &mut store);
        if entry.id.is_empty() {
            entry.id = self.fresh_id("cra");
        }
        // One entry per employee and day
        store
            .cra_entries
            .retain(|e| e.id != entry.id && !(e.employee_id == entry.employee_id && e.date == entry.date));
        debug!("PROVIDER: Saved activity entry {} ({})", entry.id, entry.value);
        store.cra_entries.push(entry.clone());
        Ok(entry)
    }

    async fn delete_cra_entry(&self, id: &str) -> Result<(), ProviderError> {
        let mut store = self.store.write().await;
        let before = store.cra_entries.len();
        store.cra_entries.retain(|e| e.id != id);
        if store.cra_entries.len() == before {
            return Err(ProviderError::NotFound {
                kind: "activity entry",
                id: id.to_string(),
            });
        }
        debug!("PROVIDER: Deleted activity entry {}", id);
        Ok(())
    }

    async fn approve_leave_request(&self, id: &str, approver: &str) -> Result<LeaveRequest, ProviderError> {
        let approver = approver.to_string();
        self.update_pending(id, move |request| {
            request.status = LeaveStatus::Approved;
            request.approved_by = Some(approver);
        })
        .await
    }

    async fn reject_leave_request(&self, id: &str, comments: &str) -> Result<LeaveRequest, ProviderError> {
        let comments = comments.to_string();
        self.update_pending(id, move |request| {
            request.status = LeaveStatus::Rejected;
            request.comments = Some(comments);
        })
        .await
    }

    async fn create_leave_request(&self, mut request: LeaveRequest) -> Result<LeaveRequest, ProviderError> {
        if request.end_date < request.start_date {
            return Err(ProviderError::InvalidRequest(format!(
                "ends {} before it starts {}",
                request.end_date, request.start_date
            )));
        }
        let mut store = self.store.write().await;
        if !store.employees.iter().any(|e| e.id == request.employee_id) {
            return Err(ProviderError::NotFound {
                kind: "employee",
                id: request.employee_id.clone(),
            });
        }
        request.id = self.fresh_id("lr");
        info!(
            "PROVIDER: Created {} request {} for {}",
            request.leave_type.label(),
            request.id,
            request.employee_id
        );
        store.leave_requests.push(request.clone());
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cra::CraValue;
    use crate::domain::leave::LeaveType;
    use chrono::NaiveDate;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_employees_sorted_by_last_name() {
        let provider = FixtureProvider::new();
        let employees = provider.employees().await.unwrap();
        assert_eq!(employees.len(), 8);
        assert!(employees.windows(2).all(|w| w[0].last_name <= w[1].last_name));
    }

    #[tokio::test]
    async fn test_leave_requests_are_seeded_once() {
        let provider = FixtureProvider::new();
        let first = provider.leave_requests(2025).await.unwrap();
        let second = provider.leave_requests(2025).await.unwrap();
        assert_eq!(first.len(), second.len());
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_cra_entries_filter_by_employee() {
        let provider = FixtureProvider::new();
        let all = provider.cra_entries(None, 2025, 5).await.unwrap();
        let one = provider.cra_entries(Some("emp-1"), 2025, 5).await.unwrap();
        assert!(one.len() < all.len());
        assert!(one.iter().all(|e| e.employee_id == "emp-1"));
    }

    #[tokio::test]
    async fn test_save_replaces_entry_on_same_day() {
        let provider = FixtureProvider::empty().with_employees(fixtures::mock_employees()).await;
        let entry = fixtures::cra_entry("", "emp-1", d(5, 20), CraValue::Days(1.0));
        let saved = provider.save_cra_entry(entry).await.unwrap();
        assert!(saved.id.starts_with("cra-new-"));

        let half = fixtures::cra_entry("", "emp-1", d(5, 20), CraValue::Days(0.5));
        provider.save_cra_entry(half).await.unwrap();

        let entries = provider.cra_entries(Some("emp-1"), 2025, 5).await.unwrap();
        let on_day: Vec<_> = entries.iter().filter(|e| e.date == d(5, 20)).collect();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].value, CraValue::Days(0.5));
    }

    #[tokio::test]
    async fn test_save_rejects_out_of_range_value() {
        let provider = FixtureProvider::new();
        let entry = fixtures::cra_entry("", "emp-1", d(5, 20), CraValue::Days(1.5));
        let err = provider.save_cra_entry(entry).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidEntry(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_entry() {
        let provider = FixtureProvider::new();
        let err = provider.delete_cra_entry("nope").await.unwrap_err();
        assert_eq!(
            err,
            ProviderError::NotFound {
                kind: "activity entry",
                id: "nope".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_approve_only_pending() {
        let provider = FixtureProvider::new();
        let requests = provider.leave_requests(2025).await.unwrap();
        let pending = requests.iter().find(|r| r.status == LeaveStatus::Pending).unwrap();
        let approved = provider.approve_leave_request(&pending.id, "emp-3").await.unwrap();
        assert_eq!(approved.status, LeaveStatus::Approved);
        assert_eq!(approved.approved_by.as_deref(), Some("emp-3"));

        let again = provider.approve_leave_request(&pending.id, "emp-3").await.unwrap_err();
        assert_eq!(again, ProviderError::NotPending(pending.id.clone()));
    }

    #[tokio::test]
    async fn test_reject_records_comment() {
        let provider = FixtureProvider::new();
        let requests = provider.leave_requests(2025).await.unwrap();
        let pending = requests.iter().find(|r| r.status == LeaveStatus::Pending).unwrap();
        let rejected = provider.reject_leave_request(&pending.id, "busy week").await.unwrap();
        assert_eq!(rejected.status, LeaveStatus::Rejected);
        assert_eq!(rejected.comments.as_deref(), Some("busy week"));
    }

    #[tokio::test]
    async fn test_create_request_assigns_id() {
        let provider = FixtureProvider::new();
        let draft = fixtures::leave_request("temp", "emp-2", LeaveType::Vacation, LeaveStatus::Pending, d(8, 4), d(8, 8));
        let created = provider.create_leave_request(draft).await.unwrap();
        assert_ne!(created.id, "temp");
        let requests = provider.leave_requests(2025).await.unwrap();
        assert!(requests.iter().any(|r| r.id == created.id));
    }

    #[tokio::test]
    async fn test_create_request_validates() {
        let provider = FixtureProvider::new();
        let backwards = fixtures::leave_request("temp", "emp-2", LeaveType::Vacation, LeaveStatus::Pending, d(8, 8), d(8, 4));
        assert!(matches!(
            provider.create_leave_request(backwards).await,
            Err(ProviderError::InvalidRequest(_))
        ));
        let stranger = fixtures::leave_request("temp", "emp-99", LeaveType::Vacation, LeaveStatus::Pending, d(8, 4), d(8, 8));
        assert!(matches!(
            provider.create_leave_request(stranger).await,
            Err(ProviderError::NotFound { kind: "employee", .. })
        ));
    }
}
