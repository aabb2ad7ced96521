use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use crate::calendar::{GridPoint, Period, ViewMode};
use crate::config::{AppMode, Config};
use crate::domain::cra::{self, CraCell, CraEntry, CraGrid, CraSummary};
use crate::domain::leave::{self, BulkAction, LeaveCell, LeaveFilter, LeaveGrid, LeaveRequest, LeaveType};
use crate::domain::Employee;

/// Root application state - single source of truth
///
/// All state changes happen through the reducer. Both calendar screens keep
/// their grid controller alive while the other one is shown, so switching
/// back restores scroll position and selection.
#[derive(Debug)]
pub struct AppState {
    pub mode: AppMode,
    pub leave: LeaveScreen,
    pub cra: CraScreen,
    pub data: DataState,
    pub panel: Panel,
    pub system: SystemState,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Config::default(), Local::now().date_naive())
    }
}

impl AppState {
    pub fn new(config: Config, today: NaiveDate) -> Self {
        let layout = config.grid_layout();
        let step = config.scroll_step();
        let leave_options = config.grid.apply(leave::grid_options(layout, step));
        let cra_options = config.grid.apply(cra::grid_options(layout, step));

        Self {
            mode: config.mode,
            leave: LeaveScreen {
                grid: LeaveGrid::new(leave_options, Period::containing(today, ViewMode::Year)),
                filter: LeaveFilter::default(),
                row_offset: 0,
            },
            cra: CraScreen {
                grid: CraGrid::new(cra_options, Period::containing(today, ViewMode::Month)),
                row_offset: 0,
            },
            data: DataState::default(),
            panel: Panel::None,
            system: SystemState {
                config,
                today,
                status_message: None,
                status_is_error: false,
                terminal_width: 0,
                terminal_height: 0,
            },
        }
    }

    /// Period of the visible screen
    pub fn period(&self) -> Period {
        match self.mode {
            AppMode::Leave => self.leave.grid.period(),
            AppMode::Cra => self.cra.grid.period(),
        }
    }

    pub fn row_offset(&self) -> usize {
        match self.mode {
            AppMode::Leave => self.leave.row_offset,
            AppMode::Cra => self.cra.row_offset,
        }
    }

    pub fn row_count(&self) -> usize {
        match self.mode {
            AppMode::Leave => self.leave.grid.calendars().len(),
            AppMode::Cra => self.cra.grid.calendars().len(),
        }
    }

    pub fn hover(&self) -> Option<GridPoint> {
        match self.mode {
            AppMode::Leave => self.leave.grid.hover(),
            AppMode::Cra => self.cra.grid.hover(),
        }
    }

    pub fn selection_len(&self) -> usize {
        match self.mode {
            AppMode::Leave => self.leave.grid.selection().len(),
            AppMode::Cra => self.cra.grid.selection().len(),
        }
    }

    pub fn is_dragging(&self) -> bool {
        match self.mode {
            AppMode::Leave => self.leave.grid.is_dragging(),
            AppMode::Cra => self.cra.grid.is_dragging(),
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.data.loading.is_empty()
    }

    /// Mark a batch as running on behalf of the open panel, if any
    pub fn begin_mutation(&mut self) {
        self.data.loading.insert(LoadingKey::Mutation);
        self.data.mutation_panel = self.panel.is_open().then(|| self.panel.clone());
    }

    pub fn set_status_message(&mut self, message: impl Into<String>) {
        self.system.status_message = Some(message.into());
        self.system.status_is_error = false;
    }

    pub fn set_status_error(&mut self, message: impl Into<String>) {
        self.system.status_message = Some(message.into());
        self.system.status_is_error = true;
    }
}

#[derive(Debug)]
pub struct LeaveScreen {
    pub grid: LeaveGrid,
    pub filter: LeaveFilter,
    /// First employee row shown
    pub row_offset: usize,
}

#[derive(Debug)]
pub struct CraScreen {
    pub grid: CraGrid,
    pub row_offset: usize,
}

/// Records loaded through the data provider
#[derive(Debug, Clone, Default)]
pub struct DataState {
    pub employees: Arc<Vec<Employee>>,
    /// Requests of `leave_year`
    pub leave_requests: Arc<Vec<LeaveRequest>>,
    pub leave_year: Option<i32>,
    /// Entries of `cra_period`
    pub cra_entries: Arc<Vec<CraEntry>>,
    pub cra_period: Option<Period>,
    pub loading: HashSet<LoadingKey>,
    pub errors: HashMap<String, String>,
    /// Panel that issued the running mutation, closed once it succeeds
    pub mutation_panel: Option<Panel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LoadingKey {
    Employees,
    LeaveRequests(i32),
    CraEntries(Period),
    Mutation,
}

#[derive(Debug, Clone)]
pub struct SystemState {
    pub config: Config,
    pub today: NaiveDate,
    pub status_message: Option<String>,
    pub status_is_error: bool,
    pub terminal_width: u16,
    pub terminal_height: u16,
}

impl SystemState {
    pub fn current_year(&self) -> i32 {
        self.today.year()
    }
}

/// Popup shown over the grid
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Panel {
    #[default]
    None,
    Help,
    /// Live text filter of the leave screen
    Search,
    /// An existing request, opened by a click
    LeaveRequest { request: LeaveRequest, employee: String },
    /// One-day request drafted on a worked day
    DraftRequest { request: LeaveRequest, employee: String },
    /// Bulk batch of leave cells
    LeaveBulk {
        cells: Vec<LeaveCell>,
        action: Option<BulkAction>,
        leave_type: LeaveType,
    },
    /// Explicit value entry for one activity cell
    CraEdit { cell: Box<CraCell>, category: usize },
    /// Bulk batch of activity cells
    CraBulk { cells: Vec<CraCell>, category: usize },
    CraSummary { summary: CraSummary, employee: String },
}

impl Panel {
    pub fn is_open(&self) -> bool {
        !matches!(self, Panel::None)
    }
}
