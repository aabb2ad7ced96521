//! Rebuilding grid rows from loaded records
//!
//! Rows are always rebuilt wholesale from the data state and the grid's
//! current day facts, then handed back to the controller.

use ratatui::layout::Rect;
use tracing::debug;

use crate::calendar::Period;
use crate::config::AppMode;
use crate::domain::{cra, leave};
use crate::tui::action::Action;
use crate::tui::effects::Effect;
use crate::tui::layout::ScreenLayout;
use crate::tui::state::{AppState, LoadingKey};

/// Leave rows for the grid's year, filtered
pub fn rebuild_leave(state: &mut AppState) {
    let year = state.leave.grid.period().year();
    let requests: &[leave::LeaveRequest] = if state.data.leave_year == Some(year) {
        state.data.leave_requests.as_slice()
    } else {
        &[]
    };
    let calendars = leave::build_calendars(&state.data.employees, requests, state.leave.grid.day_facts());
    let calendars = state.leave.filter.apply(calendars);
    state.leave.grid.set_calendars(calendars);
    state.leave.grid.settle();
    clamp_rows(state);
}

/// Activity rows for the grid's period
pub fn rebuild_cra(state: &mut AppState) {
    let period = state.cra.grid.period();
    let entries: &[cra::CraEntry] = if state.data.cra_period == Some(period) {
        state.data.cra_entries.as_slice()
    } else {
        &[]
    };
    let calendars = cra::build_calendars(&state.data.employees, entries, state.cra.grid.day_facts());
    state.cra.grid.set_calendars(calendars);
    state.cra.grid.settle();
    clamp_rows(state);
}

/// Answer a period change request of the leave grid
pub fn change_leave_period(state: &mut AppState, period: Period) -> Effect {
    debug!("SCREEN: leave period -> {}", period);
    state.leave.grid.set_period(period);
    state.leave.row_offset = 0;
    rebuild_leave(state);
    if state.data.leave_year == Some(period.year()) {
        return Effect::None;
    }
    state.data.loading.insert(LoadingKey::LeaveRequests(period.year()));
    Effect::LoadLeaveRequests(period.year())
}

/// Answer a period change request of the activity grid
pub fn change_cra_period(state: &mut AppState, period: Period) -> Effect {
    debug!("SCREEN: activity period -> {}", period);
    state.cra.grid.set_period(period);
    state.cra.row_offset = 0;
    rebuild_cra(state);
    if state.data.cra_period == Some(period) {
        return Effect::None;
    }
    state.data.loading.insert(LoadingKey::CraEntries(period));
    Effect::LoadCraEntries(period)
}

/// Reload whatever the visible screen shows
pub fn reload_active(state: &mut AppState) -> Effect {
    match state.mode {
        AppMode::Leave => {
            let year = state.leave.grid.period().year();
            state.data.loading.insert(LoadingKey::LeaveRequests(year));
            Effect::LoadLeaveRequests(year)
        }
        AppMode::Cra => {
            let period = state.cra.grid.period();
            state.data.loading.insert(LoadingKey::CraEntries(period));
            Effect::LoadCraEntries(period)
        }
    }
}

pub fn screen_layout(state: &AppState) -> ScreenLayout {
    ScreenLayout::compute(
        Rect::new(0, 0, state.system.terminal_width, state.system.terminal_height),
        state.system.config.layout.employee_column_width,
    )
}

fn visible_rows(state: &AppState) -> usize {
    screen_layout(state).visible_rows(state.system.config.layout.cell_height)
}

/// Terminal size and screen switches
pub fn reduce_screens(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    let mut state = state;
    match action {
        Action::Resize { width, height } => {
            state.system.terminal_width = *width;
            state.system.terminal_height = *height;
            let strip = f64::from(screen_layout(&state).strip_width());
            debug!("SCREEN: resized to {}x{}, day strip {}", width, height, strip);
            state.leave.grid.resize(strip);
            state.cra.grid.resize(strip);
            clamp_rows(&mut state);
            Ok((state, Effect::None))
        }
        Action::SwitchMode(mode) => {
            if state.mode == *mode {
                return Ok((state, Effect::None));
            }
            debug!("SCREEN: switching to {}", mode.label());
            state.mode = *mode;
            state.panel = Default::default();
            let effect = if active_data_missing(&state) {
                reload_active(&mut state)
            } else {
                Effect::None
            };
            Ok((state, effect))
        }
        _ => Err(state),
    }
}

/// The visible screen has neither data for its period nor a load in flight
fn active_data_missing(state: &AppState) -> bool {
    match state.mode {
        AppMode::Leave => {
            let year = state.leave.grid.period().year();
            state.data.leave_year != Some(year) && !state.data.loading.contains(&LoadingKey::LeaveRequests(year))
        }
        AppMode::Cra => {
            let period = state.cra.grid.period();
            state.data.cra_period != Some(period) && !state.data.loading.contains(&LoadingKey::CraEntries(period))
        }
    }
}

/// Keep both row offsets inside their row counts
pub fn clamp_rows(state: &mut AppState) {
    let visible = visible_rows(state);
    let leave_max = state.leave.grid.calendars().len().saturating_sub(visible);
    let cra_max = state.cra.grid.calendars().len().saturating_sub(visible);
    state.leave.row_offset = state.leave.row_offset.min(leave_max);
    state.cra.row_offset = state.cra.row_offset.min(cra_max);
}

/// Scroll the visible screen's rows by `delta`
pub fn scroll_rows(state: &mut AppState, delta: i32) {
    let offset = match state.mode {
        AppMode::Leave => &mut state.leave.row_offset,
        AppMode::Cra => &mut state.cra.row_offset,
    };
    *offset = if delta < 0 {
        offset.saturating_sub(delta.unsigned_abs() as usize)
    } else {
        offset.saturating_add(delta as usize)
    };
    clamp_rows(state);
}
