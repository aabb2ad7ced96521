use crate::calendar::{GlobalPointerEvent, GridPoint, Modifiers, Period};
use crate::config::AppMode;
use crate::domain::cra::{CraEntry, CraValue};
use crate::domain::leave::LeaveRequest;
use crate::domain::Employee;

/// Global actions - like Redux actions
///
/// All state changes in the application happen through actions.
/// Actions are dispatched from:
/// - User input (key and mouse events)
/// - Global pointer listeners (releases and moves anywhere on screen)
/// - Effects (async data loading and saving)
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    RefreshData,
    SwitchMode(AppMode),
    /// Terminal area changed; widths are in columns
    Resize { width: u16, height: u16 },

    // Pointer gestures resolved to grid coordinates
    CellClick { point: GridPoint, mods: Modifiers },
    CellDoubleClick(GridPoint),
    PointerDown(GridPoint),
    PointerEnter(GridPoint),
    PointerLeave,
    GlobalPointer(GlobalPointerEvent),
    ThumbPress { x: u16 },
    ScrollBy(f64),
    ScrollRows(i32),
    /// Export the row under the pointer
    ExportRow(usize),

    // Grid commands
    CancelDrag,
    ClearSelection,
    ManageSelection,
    PreviousMonth,
    NextMonth,
    PreviousPeriod,
    NextPeriod,
    GoToToday,
    ToggleViewMode,
    ScrollLeft,
    ScrollRight,

    // Leave screen filters
    CycleDepartmentFilter,
    CycleStatusFilter,
    CycleLeaveTypeFilter,
    /// Show only the hovered employee, or everyone again
    ToggleEmployeeFilter,
    OpenSearch,
    SearchInput(char),
    SearchBackspace,
    ClearFilter,

    /// Monthly summary of the hovered (or first) employee
    ShowSummary,
    ToggleHelp,
    ClosePanel,
    Panel(PanelCommand),

    // Data loaded
    EmployeesLoaded(Result<Vec<Employee>, String>),
    LeaveRequestsLoaded {
        year: i32,
        result: Result<Vec<LeaveRequest>, String>,
    },
    CraEntriesLoaded {
        period: Period,
        result: Result<Vec<CraEntry>, String>,
    },
    /// A save/approve/reject batch finished
    MutationDone {
        what: String,
        result: Result<usize, String>,
    },

    SetStatusMessage { message: String, is_error: bool },
}

/// Keys understood by the open panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelCommand {
    Approve,
    Reject,
    Submit,
    CycleLeaveType,
    SetValue(Option<CraValue>),
    CycleLeaveCategory,
    ApplyLeaveCategory,
}
