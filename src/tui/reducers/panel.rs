use tracing::debug;

use crate::calendar::LeaveCategory;
use crate::config::AppMode;
use crate::domain::cra::{self, CraValue};
use crate::domain::leave::{self, BulkAction, LeaveDayStatus, LeaveStatus, LeaveType};
use crate::tui::action::{Action, PanelCommand};
use crate::tui::effects::Effect;
use crate::tui::state::{AppState, Panel};

/// Recorded as the approver of requests approved from the calendar
pub const APPROVER_ID: &str = "manager";

const REJECT_COMMENT: &str = "Rejected from calendar";

/// Popup lifecycle and the commands of the open popup
pub fn reduce_panel(state: AppState, action: &Action) -> Result<(AppState, Effect), AppState> {
    let mut state = state;
    match action {
        Action::ClosePanel => {
            state.panel = Panel::None;
            Ok((state, Effect::None))
        }
        Action::ToggleHelp => {
            state.panel = match state.panel {
                Panel::Help => Panel::None,
                _ => Panel::Help,
            };
            Ok((state, Effect::None))
        }
        Action::ShowSummary => {
            show_summary(&mut state);
            Ok((state, Effect::None))
        }
        Action::Panel(command) => {
            let effect = apply_command(&mut state, *command);
            Ok((state, effect))
        }
        _ => Err(state),
    }
}

fn show_summary(state: &mut AppState) {
    if state.mode != AppMode::Cra {
        return;
    }
    let row = state.cra.grid.hover().map_or(0, |h| h.row);
    let Some(calendar) = state.cra.grid.calendars().get(row) else {
        state.set_status_error("No employee to summarize");
        return;
    };
    let period = state.cra.grid.period();
    let entries: &[cra::CraEntry] = if state.data.cra_period == Some(period) {
        state.data.cra_entries.as_slice()
    } else {
        &[]
    };
    let summary = cra::summarize(&calendar.entity.id, period, entries, state.cra.grid.day_facts());
    let employee = calendar.entity.full_name();
    debug!("SCREEN: summary of {} for {}", employee, period);
    state.panel = Panel::CraSummary { summary, employee };
}

fn apply_command(state: &mut AppState, command: PanelCommand) -> Effect {
    let today = state.system.today;
    let panel = std::mem::take(&mut state.panel);

    let (panel, effect) = match (panel, command) {
        (Panel::LeaveRequest { request, employee }, PanelCommand::Approve | PanelCommand::Reject) => {
            if request.status != LeaveStatus::Pending {
                state.set_status_error(format!("Request is {}, only pending requests can be reviewed", request.status.label().to_lowercase()));
                (Panel::LeaveRequest { request, employee }, Effect::None)
            } else {
                let effect = review(command, vec![request.id.clone()]);
                (Panel::LeaveRequest { request, employee }, effect)
            }
        }

        (Panel::DraftRequest { mut request, employee }, PanelCommand::CycleLeaveType) => {
            request.leave_type = next_leave_type(request.leave_type);
            (Panel::DraftRequest { request, employee }, Effect::None)
        }
        (Panel::DraftRequest { request, employee }, PanelCommand::Submit) => {
            let submitted = leave::LeaveRequest {
                id: String::new(),
                ..request.clone()
            };
            (Panel::DraftRequest { request, employee }, Effect::CreateRequests(vec![submitted]))
        }

        (
            Panel::LeaveBulk {
                cells,
                action: Some(BulkAction::Review),
                leave_type,
            },
            PanelCommand::Approve | PanelCommand::Reject,
        ) => {
            let ids = leave::requests_with_status(&cells, LeaveDayStatus::Pending)
                .into_iter()
                .map(|r| r.id)
                .collect();
            let effect = review(command, ids);
            (
                Panel::LeaveBulk {
                    cells,
                    action: Some(BulkAction::Review),
                    leave_type,
                },
                effect,
            )
        }
        (
            Panel::LeaveBulk {
                cells,
                action: Some(BulkAction::Assign),
                leave_type,
            },
            PanelCommand::CycleLeaveType,
        ) => (
            Panel::LeaveBulk {
                cells,
                action: Some(BulkAction::Assign),
                leave_type: next_leave_type(leave_type),
            },
            Effect::None,
        ),
        (
            Panel::LeaveBulk {
                cells,
                action: Some(BulkAction::Assign),
                leave_type,
            },
            PanelCommand::Submit,
        ) => {
            let requests = leave::assignment_requests(&cells, leave_type, LeaveStatus::Pending, "", today);
            (
                Panel::LeaveBulk {
                    cells,
                    action: Some(BulkAction::Assign),
                    leave_type,
                },
                Effect::CreateRequests(requests),
            )
        }
        (
            Panel::LeaveBulk {
                cells,
                action: Some(BulkAction::Modify),
                leave_type,
            },
            PanelCommand::Submit,
        ) => {
            let mut requests = leave::requests_with_status(&cells, LeaveDayStatus::Approved);
            requests.extend(leave::requests_with_status(&cells, LeaveDayStatus::Rtt));
            match requests.as_slice() {
                [request] => {
                    let employee = cells
                        .iter()
                        .find(|c| c.entity.id == request.employee_id)
                        .map(|c| c.entity.full_name())
                        .unwrap_or_default();
                    (
                        Panel::LeaveRequest {
                            request: request.clone(),
                            employee,
                        },
                        Effect::None,
                    )
                }
                _ => {
                    state.set_status_error(format!("{} requests selected, pick a single one to modify", requests.len()));
                    (
                        Panel::LeaveBulk {
                            cells,
                            action: Some(BulkAction::Modify),
                            leave_type,
                        },
                        Effect::None,
                    )
                }
            }
        }

        (Panel::CraEdit { cell, category }, PanelCommand::SetValue(value)) => {
            let effect = cra::change_for(&cell, value).map_or(Effect::None, |c| Effect::ApplyCraChanges(vec![c]));
            (Panel::CraEdit { cell, category }, effect)
        }
        (Panel::CraEdit { cell, category }, PanelCommand::CycleLeaveCategory) => (
            Panel::CraEdit {
                cell,
                category: (category + 1) % LeaveCategory::ALL.len(),
            },
            Effect::None,
        ),
        (Panel::CraEdit { cell, category }, PanelCommand::ApplyLeaveCategory) => {
            let value = Some(CraValue::Leave(LeaveCategory::ALL[category % LeaveCategory::ALL.len()]));
            let effect = cra::change_for(&cell, value).map_or(Effect::None, |c| Effect::ApplyCraChanges(vec![c]));
            (Panel::CraEdit { cell, category }, effect)
        }

        (Panel::CraBulk { cells, category }, PanelCommand::SetValue(value)) => {
            let effect = fill(&cells, value);
            (Panel::CraBulk { cells, category }, effect)
        }
        (Panel::CraBulk { cells, category }, PanelCommand::CycleLeaveCategory) => (
            Panel::CraBulk {
                cells,
                category: (category + 1) % LeaveCategory::ALL.len(),
            },
            Effect::None,
        ),
        (Panel::CraBulk { cells, category }, PanelCommand::ApplyLeaveCategory) => {
            let value = Some(CraValue::Leave(LeaveCategory::ALL[category % LeaveCategory::ALL.len()]));
            let effect = fill(&cells, value);
            (Panel::CraBulk { cells, category }, effect)
        }

        (panel, command) => {
            debug!("SCREEN: {:?} ignored by the open panel", command);
            (panel, Effect::None)
        }
    };

    state.panel = panel;
    if !matches!(effect, Effect::None) {
        state.begin_mutation();
    }
    effect
}

fn review(command: PanelCommand, ids: Vec<String>) -> Effect {
    if ids.is_empty() {
        return Effect::None;
    }
    match command {
        PanelCommand::Reject => Effect::RejectRequests {
            ids,
            comments: REJECT_COMMENT.to_string(),
        },
        _ => Effect::ApproveRequests {
            ids,
            approver: APPROVER_ID.to_string(),
        },
    }
}

fn fill(cells: &[cra::CraCell], value: Option<CraValue>) -> Effect {
    let changes = cra::bulk_fill(cells, value);
    if changes.is_empty() {
        Effect::None
    } else {
        Effect::ApplyCraChanges(changes)
    }
}

fn next_leave_type(current: LeaveType) -> LeaveType {
    let index = LeaveType::ALL.iter().position(|t| *t == current).unwrap_or(0);
    LeaveType::ALL[(index + 1) % LeaveType::ALL.len()]
}
