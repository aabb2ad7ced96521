//! General test utilities for TUI tests.
//!
//! This module provides common test helpers used across multiple test modules.
//! For widget-specific rendering helpers, see `crate::tui::widgets::testing`.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::config::Config;
use crate::data_provider::FixtureProvider;
use crate::fixtures;
use crate::tui::{action::Action, effects::DataEffects, reducer::reduce, runtime::Runtime, state::AppState};

/// Date every TUI test treats as today: a Thursday in May 2025
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 15).unwrap()
}

/// Fresh state on a 120x30 terminal
pub fn sized_state() -> AppState {
    reduce(
        AppState::new(Config::default(), test_today()),
        Action::Resize { width: 120, height: 30 },
    )
    .0
}

/// Sized state with fixture employees, 2025 requests and May 2025 activity
pub fn loaded_state() -> AppState {
    [
        Action::EmployeesLoaded(Ok(fixtures::mock_employees())),
        Action::LeaveRequestsLoaded {
            year: 2025,
            result: Ok(fixtures::mock_leave_requests(2025)),
        },
    ]
    .into_iter()
    .fold(sized_state(), |s, a| reduce(s, a).0)
}

/// Runtime backed by a seeded in-memory provider
pub fn create_runtime() -> Runtime {
    let data_effects = Arc::new(DataEffects::new(Arc::new(FixtureProvider::new())));
    Runtime::new(sized_state(), data_effects)
}

/// Pump the action queue until `done` holds
///
/// # Panics
///
/// Panics if the state has not settled after about a second.
pub async fn settle(runtime: &mut Runtime, done: impl Fn(&AppState) -> bool) {
    for _ in 0..100 {
        runtime.process_actions();
        if done(runtime.state()) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("runtime did not settle: {:?}", runtime.state().data.loading);
}
