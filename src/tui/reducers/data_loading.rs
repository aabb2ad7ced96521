use std::sync::Arc;

use tracing::{debug, warn};

use crate::calendar::Period;
use crate::config::AppMode;
use crate::domain::cra::CraEntry;
use crate::domain::leave::LeaveRequest;
use crate::domain::Employee;
use crate::tui::action::Action;
use crate::tui::effects::Effect;
use crate::tui::reducers::screens::{rebuild_cra, rebuild_leave, reload_active};
use crate::tui::state::{AppState, LoadingKey, Panel};

/// Handle all data loading actions (provider responses)
///
/// Returns Ok((new_state, effect)) if the action was handled,
/// or Err(state) to pass ownership back to the caller.
pub fn reduce_data_loading(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    match action {
        Action::RefreshData => Ok(handle_refresh_data(state)),
        Action::EmployeesLoaded(result) => Ok(handle_employees_loaded(state, result.clone())),
        Action::LeaveRequestsLoaded { year, result } => Ok(handle_leave_requests_loaded(state, *year, result.clone())),
        Action::CraEntriesLoaded { period, result } => Ok(handle_cra_entries_loaded(state, *period, result.clone())),
        Action::MutationDone { what, result } => Ok(handle_mutation_done(state, what, result.clone())),
        _ => Err(state),
    }
}

fn handle_refresh_data(state: AppState) -> (AppState, Effect) {
    let mut new_state = state;
    let year = new_state.leave.grid.period().year();
    let period = new_state.cra.grid.period();
    debug!("DATA: refreshing employees, leave {} and activity {}", year, period);

    new_state.data.loading.insert(LoadingKey::Employees);
    new_state.data.loading.insert(LoadingKey::LeaveRequests(year));
    new_state.data.loading.insert(LoadingKey::CraEntries(period));

    let effect = Effect::Batch(vec![
        Effect::LoadEmployees,
        Effect::LoadLeaveRequests(year),
        Effect::LoadCraEntries(period),
    ]);
    (new_state, effect)
}

fn handle_employees_loaded(state: AppState, result: Result<Vec<Employee>, String>) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.data.loading.remove(&LoadingKey::Employees);

    match result {
        Ok(employees) => {
            debug!("DATA: Loaded {} employees", employees.len());
            new_state.data.employees = Arc::new(employees);
            new_state.data.errors.remove("employees");
            rebuild_leave(&mut new_state);
            rebuild_cra(&mut new_state);
        }
        Err(e) => record_error(&mut new_state, "employees", e),
    }
    (new_state, Effect::None)
}

fn handle_leave_requests_loaded(
    state: AppState,
    year: i32,
    result: Result<Vec<LeaveRequest>, String>,
) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.data.loading.remove(&LoadingKey::LeaveRequests(year));

    if new_state.leave.grid.period().year() != year {
        debug!("DATA: Ignoring leave requests of {} (grid moved on)", year);
        return (new_state, Effect::None);
    }

    match result {
        Ok(requests) => {
            debug!("DATA: Loaded {} leave requests for {}", requests.len(), year);
            new_state.data.leave_requests = Arc::new(requests);
            new_state.data.leave_year = Some(year);
            new_state.data.errors.remove("leave_requests");
            rebuild_leave(&mut new_state);
        }
        Err(e) => record_error(&mut new_state, "leave_requests", e),
    }
    (new_state, Effect::None)
}

fn handle_cra_entries_loaded(state: AppState, period: Period, result: Result<Vec<CraEntry>, String>) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.data.loading.remove(&LoadingKey::CraEntries(period));

    if new_state.cra.grid.period() != period {
        debug!("DATA: Ignoring activity entries of {} (grid moved on)", period);
        return (new_state, Effect::None);
    }

    match result {
        Ok(entries) => {
            debug!("DATA: Loaded {} activity entries for {}", entries.len(), period);
            new_state.data.cra_entries = Arc::new(entries);
            new_state.data.cra_period = Some(period);
            new_state.data.errors.remove("cra_entries");
            rebuild_cra(&mut new_state);
        }
        Err(e) => record_error(&mut new_state, "cra_entries", e),
    }
    (new_state, Effect::None)
}

/// A batch finished: report, drop the batch and reload what is shown
///
/// Failed batches may have applied part of their changes, so the screen is
/// reloaded either way. The panel stays open on failure, and a panel opened
/// while the batch ran is never closed by it.
fn handle_mutation_done(state: AppState, what: &str, result: Result<usize, String>) -> (AppState, Effect) {
    let mut new_state = state;
    new_state.data.loading.remove(&LoadingKey::Mutation);
    let issuer = new_state.data.mutation_panel.take();

    match result {
        Ok(count) => {
            debug!("DATA: {} {} records", what, count);
            new_state.set_status_message(format!("{} {} {}", what, count, plural(count, "entry", "entries")));
            if issuer.as_ref() == Some(&new_state.panel) {
                new_state.panel = Panel::None;
            }
            match new_state.mode {
                AppMode::Leave => new_state.leave.grid.clear_selection(),
                AppMode::Cra => new_state.cra.grid.clear_selection(),
            }
        }
        Err(e) => record_error(&mut new_state, "mutation", e),
    }
    let effect = reload_active(&mut new_state);
    (new_state, effect)
}

fn record_error(state: &mut AppState, key: &str, error: String) {
    warn!("DATA: Failed to load {}: {}", key, error);
    state.data.errors.insert(key.to_string(), error.clone());
    state.set_status_error(error);
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}
