use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, warn};

use super::action::Action;
use crate::calendar::Period;
use crate::data_provider::CalendarDataProvider;
use crate::domain::cra::CraChange;
use crate::domain::leave::LeaveRequest;

/// Side effects returned by the reducer
///
/// Data variants are turned into [`Effect::Async`] by the runtime through
/// [`DataEffects`]; the reducer itself never touches the provider.
pub enum Effect {
    None,
    Action(Action),
    Batch(Vec<Effect>),
    Async(Pin<Box<dyn Future<Output = Action> + Send>>),

    LoadEmployees,
    LoadLeaveRequests(i32),
    LoadCraEntries(Period),
    ApproveRequests { ids: Vec<String>, approver: String },
    RejectRequests { ids: Vec<String>, comments: String },
    CreateRequests(Vec<LeaveRequest>),
    ApplyCraChanges(Vec<CraChange>),
}

impl fmt::Debug for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::None => write!(f, "None"),
            Effect::Action(action) => f.debug_tuple("Action").field(action).finish(),
            Effect::Batch(effects) => f.debug_tuple("Batch").field(effects).finish(),
            Effect::Async(_) => write!(f, "Async(..)"),
            Effect::LoadEmployees => write!(f, "LoadEmployees"),
            Effect::LoadLeaveRequests(year) => f.debug_tuple("LoadLeaveRequests").field(year).finish(),
            Effect::LoadCraEntries(period) => f.debug_tuple("LoadCraEntries").field(period).finish(),
            Effect::ApproveRequests { ids, .. } => f.debug_struct("ApproveRequests").field("ids", ids).finish(),
            Effect::RejectRequests { ids, .. } => f.debug_struct("RejectRequests").field("ids", ids).finish(),
            Effect::CreateRequests(requests) => write!(f, "CreateRequests({})", requests.len()),
            Effect::ApplyCraChanges(changes) => write!(f, "ApplyCraChanges({})", changes.len()),
        }
    }
}

/// Effect handler for data operations
///
/// Each method returns an Effect that dispatches the matching
/// *Loaded / MutationDone action when complete.
pub struct DataEffects {
    provider: Arc<dyn CalendarDataProvider>,
}

impl DataEffects {
    pub fn new(provider: Arc<dyn CalendarDataProvider>) -> Self {
        Self { provider }
    }

    /// Turn a data variant into an async effect; other effects pass through
    pub fn resolve(&self, effect: Effect) -> Effect {
        match effect {
            Effect::LoadEmployees => self.load_employees(),
            Effect::LoadLeaveRequests(year) => self.load_leave_requests(year),
            Effect::LoadCraEntries(period) => self.load_cra_entries(period),
            Effect::ApproveRequests { ids, approver } => self.approve_requests(ids, approver),
            Effect::RejectRequests { ids, comments } => self.reject_requests(ids, comments),
            Effect::CreateRequests(requests) => self.create_requests(requests),
            Effect::ApplyCraChanges(changes) => self.apply_cra_changes(changes),
            other => other,
        }
    }

    pub fn load_employees(&self) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let result = provider.employees().await;
            Action::EmployeesLoaded(result.map_err(|e| e.to_string()))
        }))
    }

    pub fn load_leave_requests(&self, year: i32) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let result = provider.leave_requests(year).await;
            Action::LeaveRequestsLoaded {
                year,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }

    /// Entries of every employee for the period's month
    pub fn load_cra_entries(&self, period: Period) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let result = match period.month() {
                Some(month) => provider.cra_entries(None, period.year(), month).await,
                None => {
                    let mut all = Vec::new();
                    let mut failure = None;
                    for month in 1..=12 {
                        match provider.cra_entries(None, period.year(), month).await {
                            Ok(entries) => all.extend(entries),
                            Err(e) => {
                                failure = Some(e);
                                break;
                            }
                        }
                    }
                    match failure {
                        Some(e) => Err(e),
                        None => Ok(all),
                    }
                }
            };
            Action::CraEntriesLoaded {
                period,
                result: result.map_err(|e| e.to_string()),
            }
        }))
    }

    pub fn approve_requests(&self, ids: Vec<String>, approver: String) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let mut done = 0;
            for id in &ids {
                if let Err(e) = provider.approve_leave_request(id, &approver).await {
                    warn!("EFFECT: approving {} failed: {}", id, e);
                    return mutation_failed("Approve", done, e);
                }
                done += 1;
            }
            Action::MutationDone {
                what: "Approved".to_string(),
                result: Ok(done),
            }
        }))
    }

    pub fn reject_requests(&self, ids: Vec<String>, comments: String) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let mut done = 0;
            for id in &ids {
                if let Err(e) = provider.reject_leave_request(id, &comments).await {
                    warn!("EFFECT: rejecting {} failed: {}", id, e);
                    return mutation_failed("Reject", done, e);
                }
                done += 1;
            }
            Action::MutationDone {
                what: "Rejected".to_string(),
                result: Ok(done),
            }
        }))
    }

    pub fn create_requests(&self, requests: Vec<LeaveRequest>) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            let mut done = 0;
            for request in requests {
                if let Err(e) = provider.create_leave_request(request).await {
                    return mutation_failed("Create", done, e);
                }
                done += 1;
            }
            Action::MutationDone {
                what: "Created".to_string(),
                result: Ok(done),
            }
        }))
    }

    pub fn apply_cra_changes(&self, changes: Vec<CraChange>) -> Effect {
        let provider = self.provider.clone();
        Effect::Async(Box::pin(async move {
            debug!("EFFECT: applying {} activity changes", changes.len());
            let mut done = 0;
            for change in changes {
                let result = match change {
                    CraChange::Save(entry) => provider.save_cra_entry(entry).await.map(|_| ()),
                    CraChange::Delete(id) => provider.delete_cra_entry(&id).await,
                };
                if let Err(e) = result {
                    return mutation_failed("Save", done, e);
                }
                done += 1;
            }
            Action::MutationDone {
                what: "Saved".to_string(),
                result: Ok(done),
            }
        }))
    }
}

fn mutation_failed(what: &str, done: usize, error: impl fmt::Display) -> Action {
    Action::MutationDone {
        what: what.to_string(),
        result: Err(format!("{} stopped after {}: {}", what, done, error)),
    }
}
