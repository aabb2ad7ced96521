use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::{
    CalendarGridController, DayStatus, GlobalPointerEvent, GridEntity, GridEvent, Modifiers, ViewMode,
};
use crate::config::AppMode;
use crate::domain::cra::{self, CraDayStatus, CraEntry};
use crate::domain::leave::{self, ClickIntent, LeaveDayStatus, LeaveRequest, LeaveType};
use crate::domain::Employee;
use crate::tui::action::Action;
use crate::tui::effects::Effect;
use crate::tui::reducers::screens::{change_cra_period, change_leave_period, rebuild_leave, scroll_rows};
use crate::tui::state::{AppState, Panel};

enum Outcome<E, S, D> {
    Ignored,
    Handled,
    Event(GridEvent<E, S, D>),
}

/// Engine calls shared by both screens
fn apply<E, S, D>(grid: &mut CalendarGridController<E, S, D>, action: &Action, today: NaiveDate) -> Outcome<E, S, D>
where
    E: GridEntity,
    S: DayStatus,
    D: Clone,
{
    let event = match action {
        Action::CellClick { point, mods } => grid.click(*point, *mods),
        Action::CellDoubleClick(point) => grid.double_click(*point),
        Action::PointerDown(point) => {
            grid.pointer_down(*point);
            None
        }
        Action::PointerEnter(point) => {
            grid.pointer_enter(*point);
            None
        }
        Action::PointerLeave => {
            grid.pointer_leave();
            None
        }
        Action::GlobalPointer(GlobalPointerEvent::Move { x, .. }) => {
            grid.drag_thumb_to(*x);
            None
        }
        Action::GlobalPointer(GlobalPointerEvent::Release { ctrl }) => {
            let mods = Modifiers {
                ctrl: *ctrl,
                shift: false,
            };
            if let Some(added) = grid.pointer_up(mods) {
                debug!("GRID: drag committed {} cells", added);
            }
            None
        }
        Action::ThumbPress { x } => {
            grid.begin_thumb_drag(f64::from(*x));
            None
        }
        Action::ScrollBy(delta) => {
            grid.scroll_by(*delta);
            None
        }
        Action::ScrollLeft => {
            grid.scroll_left();
            None
        }
        Action::ScrollRight => {
            grid.scroll_right();
            None
        }
        Action::CancelDrag => {
            grid.cancel_drag();
            None
        }
        Action::ClearSelection => {
            grid.clear_selection();
            None
        }
        Action::ManageSelection => grid.manage_selection(),
        Action::PreviousMonth => grid.previous_month(),
        Action::NextMonth => grid.next_month(),
        Action::PreviousPeriod => Some(grid.request_previous_period()),
        Action::NextPeriod => Some(grid.request_next_period()),
        Action::GoToToday => grid.go_to_today(today),
        Action::ToggleViewMode => {
            let (mode, month) = match grid.view_mode() {
                ViewMode::Year => (ViewMode::Month, grid.current_month().unwrap_or(0) as u32 + 1),
                ViewMode::Month => (ViewMode::Year, grid.period().month().unwrap_or(1)),
            };
            grid.request_view_mode(mode, month)
        }
        Action::ExportRow(row) => grid.request_export(*row),
        _ => return Outcome::Ignored,
    };
    match event {
        Some(event) => Outcome::Event(event),
        None => Outcome::Handled,
    }
}

/// Route grid gestures and commands to the visible screen
///
/// Returns Ok((new_state, effect)) if the action was handled,
/// or Err(state) to pass ownership back to the caller.
pub fn reduce_grid(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    let mut state = state;

    if let Action::ScrollRows(delta) = action {
        scroll_rows(&mut state, *delta);
        return Ok((state, Effect::None));
    }

    let today = state.system.today;
    let effect = match state.mode {
        AppMode::Leave => match apply(&mut state.leave.grid, action, today) {
            Outcome::Ignored => return Err(state),
            Outcome::Handled => Effect::None,
            Outcome::Event(event) => handle_leave_event(&mut state, event),
        },
        AppMode::Cra => match apply(&mut state.cra.grid, action, today) {
            Outcome::Ignored => return Err(state),
            Outcome::Handled => Effect::None,
            Outcome::Event(event) => handle_cra_event(&mut state, event),
        },
    };
    Ok((state, effect))
}

fn handle_leave_event(state: &mut AppState, event: GridEvent<Employee, LeaveDayStatus, LeaveRequest>) -> Effect {
    match event {
        GridEvent::CellClick(cell) | GridEvent::CellEditStart(cell) => {
            let employee = cell.entity.full_name();
            state.panel = match leave::click_intent(&cell, state.system.today) {
                ClickIntent::OpenRequest(request) => Panel::LeaveRequest { request, employee },
                ClickIntent::DraftRequest(request) => Panel::DraftRequest { request, employee },
                ClickIntent::Nothing => Panel::None,
            };
            Effect::None
        }
        GridEvent::BulkSelectionReady { coordinates, resolved } => {
            if resolved.is_empty() {
                state.set_status_error(format!("None of the {} selected cells are visible", coordinates.len()));
                return Effect::None;
            }
            let action = leave::analyze_bulk(&resolved);
            debug!("SCREEN: leave batch of {} -> {:?}", resolved.len(), action);
            state.panel = Panel::LeaveBulk {
                cells: resolved,
                action,
                leave_type: LeaveType::Vacation,
            };
            Effect::None
        }
        GridEvent::PeriodChangeRequested(period) => change_leave_period(state, period),
        GridEvent::ExportRequested { entity } => {
            state.set_status_message(format!("Export requested for {}", entity.full_name()));
            Effect::None
        }
    }
}

fn handle_cra_event(state: &mut AppState, event: GridEvent<Employee, CraDayStatus, CraEntry>) -> Effect {
    match event {
        GridEvent::CellClick(cell) => match cra::quick_edit(&cell) {
            Some(change) => {
                state.begin_mutation();
                Effect::ApplyCraChanges(vec![change])
            }
            None => Effect::None,
        },
        GridEvent::CellEditStart(cell) => {
            state.panel = Panel::CraEdit {
                cell: Box::new(cell),
                category: 0,
            };
            Effect::None
        }
        GridEvent::BulkSelectionReady { coordinates, resolved } => {
            let cells: Vec<_> = resolved.into_iter().filter(|c| c.day.is_editable).collect();
            if cells.is_empty() {
                state.set_status_error(format!("None of the {} selected cells can be edited", coordinates.len()));
                return Effect::None;
            }
            state.panel = Panel::CraBulk { cells, category: 0 };
            Effect::None
        }
        GridEvent::PeriodChangeRequested(period) => change_cra_period(state, period),
        GridEvent::ExportRequested { entity } => {
            state.set_status_message(format!("Export requested for {}", entity.full_name()));
            Effect::None
        }
    }
}

/// Leave filter commands
pub fn reduce_filters(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    if state.mode != AppMode::Leave {
        return Err(state);
    }
    let mut state = state;
    match action {
        Action::CycleDepartmentFilter => {
            let departments = leave::departments(&state.data.employees);
            let next = match &state.leave.filter.department {
                None => departments.first().cloned(),
                Some(current) => departments
                    .iter()
                    .position(|d| d == current)
                    .and_then(|i| departments.get(i + 1))
                    .cloned(),
            };
            state.leave.filter.department = next;
        }
        Action::CycleStatusFilter => {
            use crate::domain::leave::LeaveStatus;
            state.leave.filter.status = match state.leave.filter.status {
                None => Some(LeaveStatus::Pending),
                Some(LeaveStatus::Pending) => Some(LeaveStatus::Approved),
                Some(LeaveStatus::Approved) => Some(LeaveStatus::Rejected),
                Some(_) => None,
            };
        }
        Action::CycleLeaveTypeFilter => {
            let types = &LeaveType::ALL;
            state.leave.filter.leave_type = match state.leave.filter.leave_type {
                None => types.first().copied(),
                Some(current) => types
                    .iter()
                    .position(|t| *t == current)
                    .and_then(|i| types.get(i + 1))
                    .copied(),
            };
        }
        Action::ToggleEmployeeFilter => {
            if state.leave.filter.employee_id.take().is_none() {
                let hovered = state
                    .leave
                    .grid
                    .hover()
                    .and_then(|h| state.leave.grid.calendars().get(h.row))
                    .map(|c| c.entity.id.clone());
                match hovered {
                    Some(id) => state.leave.filter.employee_id = Some(id),
                    None => {
                        state.set_status_error("Point at an employee to focus on");
                        return Ok((state, Effect::None));
                    }
                }
            }
        }
        Action::OpenSearch => {
            state.panel = Panel::Search;
            return Ok((state, Effect::None));
        }
        Action::SearchInput(c) => state.leave.filter.search.push(*c),
        Action::SearchBackspace => {
            state.leave.filter.search.pop();
        }
        Action::ClearFilter => state.leave.filter = Default::default(),
        _ => return Err(state),
    }
    debug!("SCREEN: leave filter {:?}", state.leave.filter);
    rebuild_leave(&mut state);
    Ok((state, Effect::None))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{GridPoint, Period};
    use crate::config::Config;
    use crate::domain::leave::LeaveStatus;
    use crate::fixtures;
    use crate::tui::reducers::screens::rebuild_cra;
    use crate::tui::state::LoadingKey;
    use std::sync::Arc;

    fn may(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, day).unwrap()
    }

    fn leave_state() -> AppState {
        let mut state = AppState::new(Config::default(), may(15));
        state.data.employees = Arc::new(vec![
            fixtures::employee("e1", "Ana", "Alpha", "Engineering", "Dev"),
            fixtures::employee("e2", "Ben", "Beta", "Finance", "Analyst"),
        ]);
        state.data.leave_requests = Arc::new(vec![fixtures::leave_request(
            "r1",
            "e1",
            LeaveType::Vacation,
            LeaveStatus::Pending,
            may(12),
            may(13),
        )]);
        state.data.leave_year = Some(2025);
        rebuild_leave(&mut state);
        state
    }

    fn cra_state() -> AppState {
        let config = Config {
            mode: AppMode::Cra,
            ..Config::default()
        };
        let mut state = AppState::new(config, may(15));
        state.data.employees = Arc::new(vec![fixtures::employee("e1", "Ana", "Alpha", "Engineering", "Dev")]);
        state.data.cra_period = Some(Period::Month { year: 2025, month: 5 });
        rebuild_cra(&mut state);
        state
    }

    fn reduce(state: AppState, action: Action) -> (AppState, Effect) {
        reduce_grid(state, &action).unwrap_or_else(|_| panic!("{:?} not handled", action))
    }

    /// Day index of May `day` in the 2025 year view
    fn year_index(day: u32) -> usize {
        (31 + 28 + 31 + 30 + day - 1) as usize
    }

    #[test]
    fn test_click_on_pending_opens_request() {
        let state = leave_state();
        let point = GridPoint::new(0, year_index(12));
        let (state, _) = reduce(state, Action::CellClick { point, mods: Modifiers::NONE });
        match state.panel {
            Panel::LeaveRequest { request, employee } => {
                assert_eq!(request.id, "r1");
                assert_eq!(employee, "Ana Alpha");
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn test_click_on_worked_day_drafts_request() {
        let state = leave_state();
        let point = GridPoint::new(1, year_index(6));
        let (state, _) = reduce(state, Action::CellClick { point, mods: Modifiers::NONE });
        assert!(matches!(state.panel, Panel::DraftRequest { ref request, .. } if request.start_date == may(6)));
    }

    #[test]
    fn test_ctrl_click_selects_without_panel() {
        let state = leave_state();
        let point = GridPoint::new(1, year_index(6));
        let (state, _) = reduce(state, Action::CellClick { point, mods: Modifiers::CTRL });
        assert_eq!(state.panel, Panel::None);
        assert_eq!(state.selection_len(), 1);
    }

    #[test]
    fn test_drag_then_release_selects_rectangle() {
        let state = leave_state();
        let (state, _) = reduce(state, Action::PointerDown(GridPoint::new(0, year_index(5))));
        let (state, _) = reduce(state, Action::PointerEnter(GridPoint::new(1, year_index(7))));
        assert!(state.is_dragging());
        let (state, _) = reduce(state, Action::GlobalPointer(GlobalPointerEvent::Release { ctrl: false }));
        assert!(!state.is_dragging());
        assert_eq!(state.selection_len(), 6);
    }

    #[test]
    fn test_manage_selection_analyzes_batch() {
        let state = leave_state();
        let (state, _) = reduce(
            state,
            Action::CellClick {
                point: GridPoint::new(0, year_index(12)),
                mods: Modifiers::CTRL,
            },
        );
        let (state, _) = reduce(
            state,
            Action::CellClick {
                point: GridPoint::new(0, year_index(13)),
                mods: Modifiers::NONE,
            },
        );
        let (state, _) = reduce(state, Action::ManageSelection);
        match state.panel {
            Panel::LeaveBulk { cells, action, .. } => {
                assert_eq!(cells.len(), 2);
                assert_eq!(action, Some(leave::BulkAction::Review));
            }
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn test_next_period_reloads_other_year() {
        let state = leave_state();
        let (state, effect) = reduce(state, Action::NextPeriod);
        assert_eq!(state.period(), Period::Year(2026));
        assert!(matches!(effect, Effect::LoadLeaveRequests(2026)));
        assert!(state.data.loading.contains(&LoadingKey::LeaveRequests(2026)));
        assert_eq!(state.leave.grid.calendars().len(), 2);
    }

    #[test]
    fn test_toggle_view_mode_keeps_loaded_year() {
        let state = leave_state();
        let (state, effect) = reduce(state, Action::ToggleViewMode);
        assert_eq!(state.period(), Period::Month { year: 2025, month: 1 });
        assert!(matches!(effect, Effect::None));
    }

    #[test]
    fn test_cra_click_cycles_value() {
        let state = cra_state();
        let (state, effect) = reduce(
            state,
            Action::CellClick {
                point: GridPoint::new(0, 5),
                mods: Modifiers::NONE,
            },
        );
        match effect {
            Effect::ApplyCraChanges(changes) => assert_eq!(changes.len(), 1),
            other => panic!("unexpected effect {:?}", other),
        }
        assert!(state.data.loading.contains(&LoadingKey::Mutation));
    }

    #[test]
    fn test_cra_click_on_weekend_does_nothing() {
        let state = cra_state();
        // May 3 2025 is a Saturday
        let (_, effect) = reduce(
            state,
            Action::CellClick {
                point: GridPoint::new(0, 2),
                mods: Modifiers::NONE,
            },
        );
        assert!(matches!(effect, Effect::None));
    }

    #[test]
    fn test_cra_double_click_opens_editor() {
        let state = cra_state();
        let (state, _) = reduce(state, Action::CellDoubleClick(GridPoint::new(0, 5)));
        assert!(matches!(state.panel, Panel::CraEdit { .. }));
    }

    #[test]
    fn test_export_sets_status() {
        let state = leave_state();
        let (state, _) = reduce(state, Action::ExportRow(1));
        assert_eq!(state.system.status_message.as_deref(), Some("Export requested for Ben Beta"));
    }

    #[test]
    fn test_unrelated_action_passes_through() {
        let state = leave_state();
        assert!(reduce_grid(state, &Action::Quit).is_err());
    }

    #[test]
    fn test_department_filter_cycles() {
        let state = leave_state();
        let (state, _) = reduce_filters(state, &Action::CycleDepartmentFilter).unwrap();
        assert_eq!(state.leave.filter.department.as_deref(), Some("Engineering"));
        assert_eq!(state.leave.grid.calendars().len(), 1);
        let (state, _) = reduce_filters(state, &Action::CycleDepartmentFilter).unwrap();
        assert_eq!(state.leave.filter.department.as_deref(), Some("Finance"));
        let (state, _) = reduce_filters(state, &Action::CycleDepartmentFilter).unwrap();
        assert_eq!(state.leave.filter.department, None);
        assert_eq!(state.leave.grid.calendars().len(), 2);
    }

    #[test]
    fn test_search_filters_rows_as_typed() {
        let (state, _) = reduce_filters(leave_state(), &Action::OpenSearch).unwrap();
        assert_eq!(state.panel, Panel::Search);
        let state = "fin".chars().fold(state, |s, c| reduce_filters(s, &Action::SearchInput(c)).unwrap().0);
        assert_eq!(state.leave.filter.search, "fin");
        assert_eq!(state.leave.grid.calendars().len(), 1);
        assert_eq!(state.leave.grid.calendars()[0].entity.id, "e2");

        let state = (0..2).fold(state, |s, _| reduce_filters(s, &Action::SearchBackspace).unwrap().0);
        assert_eq!(state.leave.filter.search, "f");
        let (state, _) = reduce_filters(state, &Action::ClearFilter).unwrap();
        assert_eq!(state.leave.grid.calendars().len(), 2);
    }

    #[test]
    fn test_leave_type_filter_cycles_through_all_types() {
        let (state, _) = reduce_filters(leave_state(), &Action::CycleLeaveTypeFilter).unwrap();
        assert_eq!(state.leave.filter.leave_type, Some(LeaveType::Vacation));
        assert_eq!(state.leave.grid.calendars().len(), 1);
        let (state, _) = reduce_filters(state, &Action::CycleLeaveTypeFilter).unwrap();
        assert_eq!(state.leave.filter.leave_type, Some(LeaveType::Sick));
        assert!(state.leave.grid.calendars().is_empty());
        let state = (0..LeaveType::ALL.len() - 1)
            .fold(state, |s, _| reduce_filters(s, &Action::CycleLeaveTypeFilter).unwrap().0);
        assert_eq!(state.leave.filter.leave_type, None);
        assert_eq!(state.leave.grid.calendars().len(), 2);
    }

    #[test]
    fn test_employee_filter_follows_hover() {
        let (state, _) = reduce_filters(leave_state(), &Action::ToggleEmployeeFilter).unwrap();
        assert_eq!(state.leave.filter.employee_id, None);
        assert!(state.system.status_is_error);

        let mut state = state;
        state.leave.grid.pointer_enter(GridPoint::new(1, 3));
        let (state, _) = reduce_filters(state, &Action::ToggleEmployeeFilter).unwrap();
        assert_eq!(state.leave.filter.employee_id.as_deref(), Some("e2"));
        assert_eq!(state.leave.grid.calendars().len(), 1);

        let (state, _) = reduce_filters(state, &Action::ToggleEmployeeFilter).unwrap();
        assert_eq!(state.leave.filter.employee_id, None);
        assert_eq!(state.leave.grid.calendars().len(), 2);
    }
}
