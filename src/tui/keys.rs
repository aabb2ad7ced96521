/// Keyboard event to action mapping
///
/// Converts crossterm KeyEvents into Actions. While a popup is open its own
/// keys take precedence and grid keys are swallowed.
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, trace};

use super::action::{Action, PanelCommand};
use super::state::{AppState, Panel};
use crate::config::AppMode;
use crate::domain::cra::{CraValue, FULL_DAY, HALF_DAY};

/// Handle global keys that work regardless of mode or popup
fn handle_global_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Action::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        _ => None,
    }
}

/// ESC unwinds one level: drag, then popup, then selection
fn handle_esc_key(state: &AppState) -> Option<Action> {
    if state.is_dragging() {
        debug!("KEY: ESC pressed while dragging - cancelling drag");
        return Some(Action::CancelDrag);
    }
    if state.panel.is_open() {
        debug!("KEY: ESC pressed with popup open - closing it");
        return Some(Action::ClosePanel);
    }
    if state.selection_len() > 0 {
        debug!("KEY: ESC pressed with {} selected - clearing", state.selection_len());
        return Some(Action::ClearSelection);
    }
    None
}

/// The search popup takes every printable key
fn handle_search_keys(key: KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Esc | KeyCode::Enter => Some(Action::ClosePanel),
        KeyCode::Backspace => Some(Action::SearchBackspace),
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            Some(Action::SearchInput(c))
        }
        _ => None,
    }
}

fn handle_panel_keys(key: KeyEvent, panel: &Panel) -> Option<Action> {
    let command = match (panel, key.code) {
        (Panel::Help | Panel::CraSummary { .. }, KeyCode::Enter) => return Some(Action::ClosePanel),
        (Panel::Help, KeyCode::Char('?')) => return Some(Action::ToggleHelp),

        (Panel::LeaveRequest { .. } | Panel::LeaveBulk { .. }, KeyCode::Char('a')) => PanelCommand::Approve,
        (Panel::LeaveRequest { .. } | Panel::LeaveBulk { .. }, KeyCode::Char('r')) => PanelCommand::Reject,
        (Panel::DraftRequest { .. } | Panel::LeaveBulk { .. }, KeyCode::Char('t')) => PanelCommand::CycleLeaveType,
        (Panel::DraftRequest { .. } | Panel::LeaveBulk { .. }, KeyCode::Enter) => PanelCommand::Submit,

        (Panel::CraEdit { .. } | Panel::CraBulk { .. }, KeyCode::Char('1')) => {
            PanelCommand::SetValue(Some(CraValue::Days(FULL_DAY)))
        }
        (Panel::CraEdit { .. } | Panel::CraBulk { .. }, KeyCode::Char('h')) => {
            PanelCommand::SetValue(Some(CraValue::Days(HALF_DAY)))
        }
        (Panel::CraEdit { .. } | Panel::CraBulk { .. }, KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace) => {
            PanelCommand::SetValue(None)
        }
        (Panel::CraEdit { .. } | Panel::CraBulk { .. }, KeyCode::Char('l') | KeyCode::Tab) => {
            PanelCommand::CycleLeaveCategory
        }
        (Panel::CraEdit { .. } | Panel::CraBulk { .. }, KeyCode::Enter) => PanelCommand::ApplyLeaveCategory,

        _ => return None,
    };
    Some(Action::Panel(command))
}

/// Keys of the calendar screens
fn handle_grid_keys(key: KeyEvent, state: &AppState) -> Option<Action> {
    let action = match key.code {
        KeyCode::Tab => Some(Action::SwitchMode(match state.mode {
            AppMode::Leave => AppMode::Cra,
            AppMode::Cra => AppMode::Leave,
        })),
        KeyCode::Char('1') => Some(Action::SwitchMode(AppMode::Leave)),
        KeyCode::Char('2') => Some(Action::SwitchMode(AppMode::Cra)),

        KeyCode::Left if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::ScrollLeft),
        KeyCode::Right if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::ScrollRight),
        KeyCode::Left => Some(Action::PreviousMonth),
        KeyCode::Right => Some(Action::NextMonth),
        KeyCode::Char('h') => Some(Action::ScrollLeft),
        KeyCode::Char('l') => Some(Action::ScrollRight),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::PreviousPeriod),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::NextPeriod),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollRows(-1)),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollRows(1)),
        KeyCode::Char('t') => Some(Action::GoToToday),
        KeyCode::Char('v') => Some(Action::ToggleViewMode),

        KeyCode::Char('m') | KeyCode::Enter => Some(Action::ManageSelection),
        KeyCode::Char('c') => Some(Action::ClearSelection),
        KeyCode::Char('r') => Some(Action::RefreshData),
        KeyCode::Char('?') => Some(Action::ToggleHelp),
        KeyCode::Char('e') => state.hover().map(|h| Action::ExportRow(h.row)),

        KeyCode::Char('d') if state.mode == AppMode::Leave => Some(Action::CycleDepartmentFilter),
        KeyCode::Char('s') if state.mode == AppMode::Leave => Some(Action::CycleStatusFilter),
        KeyCode::Char('y') if state.mode == AppMode::Leave => Some(Action::CycleLeaveTypeFilter),
        KeyCode::Char('f') if state.mode == AppMode::Leave => Some(Action::ToggleEmployeeFilter),
        KeyCode::Char('/') if state.mode == AppMode::Leave => Some(Action::OpenSearch),
        KeyCode::Char('x') if state.mode == AppMode::Leave => Some(Action::ClearFilter),
        KeyCode::Char('S') | KeyCode::Char('s') if state.mode == AppMode::Cra => Some(Action::ShowSummary),
        _ => None,
    };
    if action.is_some() {
        debug!("KEY: {:?} -> {:?}", key.code, action);
    }
    action
}

/// Convert a KeyEvent into an Action based on current application state
///
/// Order of precedence:
/// - Text entry, while the search popup is open
/// - Global keys (q, Ctrl+C)
/// - ESC (drag, popup, selection)
/// - Popup keys, when a popup is open
/// - Calendar keys of the visible screen
pub fn key_to_action(key: KeyEvent, state: &AppState) -> Option<Action> {
    trace!(
        "KEY: {:?} (mode={:?}, panel_open={}, selected={})",
        key.code,
        state.mode,
        state.panel.is_open(),
        state.selection_len()
    );

    if state.panel == Panel::Search {
        return handle_search_keys(key);
    }

    if let Some(action) = handle_global_keys(key) {
        return Some(action);
    }

    if key.code == KeyCode::Esc {
        return handle_esc_key(state);
    }

    if state.panel.is_open() {
        return handle_panel_keys(key, &state.panel);
    }

    handle_grid_keys(key, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{GridPoint, Modifiers};
    use crate::config::Config;
    use crate::fixtures;
    use crate::tui::reducers::screens::rebuild_leave;
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> AppState {
        let mut state = AppState::new(Config::default(), NaiveDate::from_ymd_opt(2025, 5, 15).unwrap());
        state.data.employees = Arc::new(fixtures::mock_employees());
        rebuild_leave(&mut state);
        state
    }

    #[test]
    fn test_quit_keys() {
        let s = state();
        assert_eq!(key_to_action(key(KeyCode::Char('q')), &s), Some(Action::Quit));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &s),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_esc_priority() {
        let mut s = state();
        assert_eq!(key_to_action(key(KeyCode::Esc), &s), None);

        s.leave.grid.click(GridPoint::new(0, 5), Modifiers::CTRL);
        assert_eq!(key_to_action(key(KeyCode::Esc), &s), Some(Action::ClearSelection));

        s.panel = Panel::Help;
        assert_eq!(key_to_action(key(KeyCode::Esc), &s), Some(Action::ClosePanel));

        s.leave.grid.pointer_down(GridPoint::new(0, 6));
        s.leave.grid.pointer_enter(GridPoint::new(1, 7));
        assert_eq!(key_to_action(key(KeyCode::Esc), &s), Some(Action::CancelDrag));
    }

    #[test]
    fn test_navigation_keys() {
        let s = state();
        assert_eq!(key_to_action(key(KeyCode::Left), &s), Some(Action::PreviousMonth));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Right, KeyModifiers::SHIFT), &s),
            Some(Action::ScrollRight)
        );
        assert_eq!(key_to_action(key(KeyCode::PageDown), &s), Some(Action::NextPeriod));
        assert_eq!(key_to_action(key(KeyCode::Tab), &s), Some(Action::SwitchMode(AppMode::Cra)));
        assert_eq!(key_to_action(key(KeyCode::Char('m')), &s), Some(Action::ManageSelection));
    }

    #[test]
    fn test_export_needs_hovered_row() {
        let mut s = state();
        assert_eq!(key_to_action(key(KeyCode::Char('e')), &s), None);
        s.leave.grid.pointer_enter(GridPoint::new(3, 0));
        assert_eq!(key_to_action(key(KeyCode::Char('e')), &s), Some(Action::ExportRow(3)));
    }

    #[test]
    fn test_filter_keys_only_on_leave_screen() {
        let mut s = state();
        assert_eq!(key_to_action(key(KeyCode::Char('d')), &s), Some(Action::CycleDepartmentFilter));
        s.mode = AppMode::Cra;
        assert_eq!(key_to_action(key(KeyCode::Char('d')), &s), None);
        assert_eq!(key_to_action(key(KeyCode::Char('s')), &s), Some(Action::ShowSummary));
    }

    #[test]
    fn test_popup_swallows_grid_keys() {
        let mut s = state();
        s.panel = Panel::Help;
        assert_eq!(key_to_action(key(KeyCode::Left), &s), None);
        assert_eq!(key_to_action(key(KeyCode::Enter), &s), Some(Action::ClosePanel));
    }

    #[test]
    fn test_activity_editor_keys() {
        let mut s = state();
        s.panel = Panel::CraBulk {
            cells: Vec::new(),
            category: 0,
        };
        assert_eq!(
            key_to_action(key(KeyCode::Char('h')), &s),
            Some(Action::Panel(PanelCommand::SetValue(Some(CraValue::Days(HALF_DAY)))))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Delete), &s),
            Some(Action::Panel(PanelCommand::SetValue(None)))
        );
        assert_eq!(
            key_to_action(key(KeyCode::Enter), &s),
            Some(Action::Panel(PanelCommand::ApplyLeaveCategory))
        );
    }

    #[test]
    fn test_search_popup_takes_text_keys() {
        let mut s = state();
        assert_eq!(key_to_action(key(KeyCode::Char('/')), &s), Some(Action::OpenSearch));
        assert_eq!(key_to_action(key(KeyCode::Char('y')), &s), Some(Action::CycleLeaveTypeFilter));

        s.panel = Panel::Search;
        assert_eq!(key_to_action(key(KeyCode::Char('q')), &s), Some(Action::SearchInput('q')));
        assert_eq!(key_to_action(key(KeyCode::Char('1')), &s), Some(Action::SearchInput('1')));
        assert_eq!(key_to_action(key(KeyCode::Backspace), &s), Some(Action::SearchBackspace));
        assert_eq!(key_to_action(key(KeyCode::Enter), &s), Some(Action::ClosePanel));
        assert_eq!(
            key_to_action(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL), &s),
            Some(Action::Quit)
        );
    }
}
