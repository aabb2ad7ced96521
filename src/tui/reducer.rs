use tracing::debug;

use super::action::Action;
use super::effects::Effect;
use super::state::AppState;

use crate::tui::reducers::{
    reduce_data_loading, reduce_filters, reduce_grid, reduce_panel, reduce_screens,
};

/// Pure state reducer - like Redux reducer
///
/// Takes current state and an action, returns new state and optional effect.
/// No I/O happens here: provider calls are returned as data [`Effect`]s and
/// executed by the runtime.
///
/// Ownership is passed through the sub-reducer chain to avoid cloning:
/// - Each sub-reducer returns Ok((state, effect)) if it handled the action
/// - Or Err(state) to pass ownership back for the next reducer to try
pub fn reduce(state: AppState, action: Action) -> (AppState, Effect) {
    // Terminal size and mode switches
    let state = match reduce_screens(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    // Provider responses
    let state = match reduce_data_loading(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    // Popups
    let state = match reduce_panel(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    // Leave filters
    let state = match reduce_filters(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    // Pointer gestures and grid commands of the visible screen
    let state = match reduce_grid(state, &action) {
        Ok(result) => return result,
        Err(state) => state,
    };

    match action {
        Action::SetStatusMessage { message, is_error } => {
            let mut new_state = state;
            if is_error {
                new_state.set_status_error(message);
            } else {
                new_state.set_status_message(message);
            }
            (new_state, Effect::None)
        }

        Action::Quit => (state, Effect::None),

        other => {
            debug!("ACTION: {:?} not handled in {} mode", other, state.mode.label());
            (state, Effect::None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{GridPoint, Modifiers, Period};
    use crate::config::{AppMode, Config};
    use crate::fixtures;
    use crate::tui::state::Panel;
    use chrono::NaiveDate;

    fn state() -> AppState {
        AppState::new(Config::default(), NaiveDate::from_ymd_opt(2025, 5, 15).unwrap())
    }

    fn run(state: AppState, actions: Vec<Action>) -> AppState {
        actions.into_iter().fold(state, |s, a| reduce(s, a).0)
    }

    #[test]
    fn test_status_message_is_set() {
        let (state, _) = reduce(
            state(),
            Action::SetStatusMessage {
                message: "hello".to_string(),
                is_error: true,
            },
        );
        assert_eq!(state.system.status_message.as_deref(), Some("hello"));
        assert!(state.system.status_is_error);
    }

    #[test]
    fn test_loaded_data_flows_into_clicks() {
        let state = run(
            state(),
            vec![
                Action::Resize { width: 120, height: 30 },
                Action::EmployeesLoaded(Ok(fixtures::mock_employees())),
                Action::LeaveRequestsLoaded {
                    year: 2025,
                    result: Ok(fixtures::mock_leave_requests(2025)),
                },
            ],
        );
        assert_eq!(state.row_count(), 8);

        // Employee 1's approved vacation runs January 10 to 14
        let (state, _) = reduce(
            state,
            Action::CellClick {
                point: GridPoint::new(0, 12),
                mods: Modifiers::NONE,
            },
        );
        match &state.panel {
            Panel::LeaveRequest { request, .. } => assert_eq!(request.employee_id, "emp-1"),
            other => panic!("unexpected panel {:?}", other),
        }
    }

    #[test]
    fn test_switching_mode_keeps_each_grid() {
        let state = run(
            state(),
            vec![
                Action::EmployeesLoaded(Ok(fixtures::mock_employees())),
                Action::NextPeriod,
                Action::SwitchMode(AppMode::Cra),
                Action::NextMonth,
                Action::SwitchMode(AppMode::Leave),
            ],
        );
        assert_eq!(state.leave.grid.period(), Period::Year(2026));
        assert_eq!(state.cra.grid.period(), Period::Month { year: 2025, month: 6 });
    }

    #[test]
    fn test_quit_is_a_no_op_for_state() {
        let (state, effect) = reduce(state(), Action::Quit);
        assert_eq!(state.panel, Panel::None);
        assert!(matches!(effect, Effect::None));
    }
}
