/// Frame composition
///
/// Turns the application state into one frame: title, calendar grid,
/// navigation bar, legend, status bar and the open popup, if any.
use ratatui::{buffer::Buffer, layout::Rect};

use super::layout::{ScreenLayout, HEADER_HEIGHT};
use super::state::{AppState, Panel};
use super::widgets::{
    popup_area, CalendarGridWidget, KeyHint, KeyHintStyle, Legend, NavBar, PanelWidget, RenderableWidget,
    StatusBar, TitleBar,
};
use super::widgets::panel::LineKind;
use crate::calendar::period::month_name;
use crate::calendar::{CalendarGridController, DayStatus, GridEntity, LeaveCategory, Period};
use crate::config::{AppMode, ThemeConfig};
use crate::domain::leave::{self, BulkAction, LeaveDayStatus};

const HELP_LINES: [&str; 16] = [
    "Click          open / edit a day",
    "Ctrl+click     add a day to the selection",
    "Drag           select a rectangle of days",
    "Double-click   edit an activity day",
    "m / Enter      act on the selection",
    "← →            previous / next month",
    "Shift+← →  h l scroll the days",
    "[ ]            previous / next period",
    "↑ ↓  j k       scroll employees",
    "t / v          today / year-month view",
    "d s y          department, status, type filter",
    "f / x          focus hovered employee, clear",
    "/              search employees",
    "S              activity summary",
    "Tab  1 2       switch calendar",
    "r / e / q      refresh, export row, quit",
];

/// Draw the whole screen into `buf`
pub fn render(state: &AppState, area: Rect, buf: &mut Buffer) {
    let config = &state.system.config;
    let theme = &config.theme;
    let layout = ScreenLayout::compute(area, config.layout.employee_column_width);

    title_bar(state).render(layout.title, buf, theme);

    let grid_area = Rect::new(
        area.x,
        layout.header_names.y,
        area.width,
        HEADER_HEIGHT.min(layout.header_names.height) + layout.days.height,
    );
    let name_width = layout.names.width;
    match state.mode {
        AppMode::Leave => {
            CalendarGridWidget::new(&state.leave.grid, state.leave.row_offset, name_width).render(grid_area, buf, theme);
            nav_bar(&state.leave.grid, name_width).render(nav_area(&layout), buf, theme);
        }
        AppMode::Cra => {
            CalendarGridWidget::new(&state.cra.grid, state.cra.row_offset, name_width).render(grid_area, buf, theme);
            nav_bar(&state.cra.grid, name_width).render(nav_area(&layout), buf, theme);
        }
    }

    Legend::for_mode(state.mode).render(layout.legend, buf, theme);
    status_bar(state).render(layout.status, buf, theme);

    if let Some(panel) = panel_widget(state) {
        render_panel(&panel, area, buf, theme);
    }
}

fn nav_area(layout: &ScreenLayout) -> Rect {
    Rect::new(
        layout.nav.x,
        layout.nav.y,
        layout.nav.width + layout.scrollbar.width,
        layout.nav.height,
    )
}

fn render_panel(panel: &PanelWidget, area: Rect, buf: &mut Buffer, theme: &ThemeConfig) {
    let width = panel.preferred_width().unwrap_or(40).max(30);
    let height = panel.preferred_height().unwrap_or(5);
    panel.render(popup_area(area, width, height), buf, theme);
}

fn title_bar(state: &AppState) -> TitleBar {
    let filter = match state.mode {
        AppMode::Leave => {
            let filter = &state.leave.filter;
            let search = filter.search.trim();
            let employee = filter.employee_id.as_ref().map(|id| {
                state
                    .data
                    .employees
                    .iter()
                    .find(|e| e.id == *id)
                    .map_or_else(|| id.clone(), |e| e.full_name())
            });
            let parts: Vec<String> = (!search.is_empty())
                .then(|| format!("\"{}\"", search))
                .into_iter()
                .chain(filter.department.clone())
                .chain(employee)
                .chain(filter.leave_type.map(|t| t.label().to_string()))
                .chain(filter.status.map(|s| s.label().to_string()))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        AppMode::Cra => None,
    };
    TitleBar {
        mode: state.mode,
        filter,
        loading: state.is_loading(),
        selected: state.selection_len(),
    }
}

fn nav_bar<E, S, D>(grid: &CalendarGridController<E, S, D>, nav_width: u16) -> NavBar
where
    E: GridEntity,
    S: DayStatus,
    D: Clone,
{
    let scroller = grid.scroller();
    let (label, can_previous, can_next) = match grid.period() {
        Period::Year(_) => {
            let month = grid.current_month().unwrap_or(0) as u32 + 1;
            (
                month_name(month).unwrap_or_default().to_string(),
                scroller.can_scroll_previous(),
                scroller.can_scroll_next(),
            )
        }
        period @ Period::Month { .. } => (period.to_string(), true, true),
    };
    NavBar {
        label,
        can_previous,
        can_next,
        thumb_width_percent: scroller.thumb_width_percent().round() as u16,
        thumb_position_percent: scroller.thumb_position_percent().round() as u16,
        nav_width,
    }
}

fn status_bar(state: &AppState) -> StatusBar {
    let hints = match &state.panel {
        Panel::None => {
            let mut hints = vec![KeyHint::new("?", "Help"), KeyHint::new("Tab", "Switch")];
            if state.selection_len() > 0 {
                hints.insert(0, KeyHint::with_style("m", "Manage", KeyHintStyle::Important));
            }
            hints.push(KeyHint::with_style("q", "Quit", KeyHintStyle::Subtle));
            hints
        }
        _ => vec![KeyHint::with_style("Esc", "Close", KeyHintStyle::Important)],
    };
    let bar = StatusBar::new().with_hints(hints);
    match &state.system.status_message {
        Some(message) if state.system.status_is_error => bar.with_error(message.clone()),
        Some(message) => bar.with_status(message.clone()),
        None => bar,
    }
}

fn category_label(index: usize) -> &'static str {
    LeaveCategory::ALL[index % LeaveCategory::ALL.len()].label()
}

/// Popup content for the open panel
pub fn panel_widget(state: &AppState) -> Option<PanelWidget> {
    let widget = match &state.panel {
        Panel::None => return None,

        Panel::Help => HELP_LINES
            .iter()
            .fold(PanelWidget::new("Keys"), |panel, line| panel.line(*line))
            .hint("Esc", "close"),

        Panel::Search => PanelWidget::new("Search")
            .line(format!("> {}_", state.leave.filter.search))
            .styled("name, department or position", LineKind::Dim)
            .hint("Enter", "done"),

        Panel::LeaveRequest { request, employee } => {
            let mut panel = PanelWidget::new("Leave request")
                .styled(employee.clone(), LineKind::Heading)
                .line(format!("{} · {} day(s)", request.leave_type.label(), request.total_days))
                .line(format!(
                    "{} → {}",
                    request.start_date.format("%d/%m/%Y"),
                    request.end_date.format("%d/%m/%Y")
                ))
                .line(format!("Status: {}", request.status.label()));
            if !request.reason.is_empty() {
                panel = panel.styled(request.reason.clone(), LineKind::Dim);
            }
            if let Some(comments) = &request.comments {
                panel = panel.styled(comments.clone(), LineKind::Dim);
            }
            if request.status == leave::LeaveStatus::Pending {
                panel = panel.hint("a", "approve").hint("r", "reject");
            }
            panel.hint("Esc", "close")
        }

        Panel::DraftRequest { request, employee } => PanelWidget::new("New leave request")
            .styled(employee.clone(), LineKind::Heading)
            .line(format!("On {}", request.start_date.format("%d/%m/%Y")))
            .line(format!("Type: {}", request.leave_type.label()))
            .hint("t", "type")
            .hint("Enter", "submit")
            .hint("Esc", "cancel"),

        Panel::LeaveBulk {
            cells,
            action,
            leave_type,
        } => {
            let employees = {
                let mut ids: Vec<&str> = cells.iter().map(|c| c.entity.id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();
                ids.len()
            };
            let mut panel = PanelWidget::new("Selection")
                .styled(
                    format!("{} day(s), {} employee(s)", cells.len(), employees),
                    LineKind::Heading,
                )
                .line(leave::date_range_text(cells));
            for (label, status) in [
                ("Pending", LeaveDayStatus::Pending),
                ("Approved", LeaveDayStatus::Approved),
                ("RTT", LeaveDayStatus::Rtt),
                ("Worked", LeaveDayStatus::Worked),
            ] {
                let count = leave::status_count(cells, status);
                if count > 0 {
                    panel = panel.styled(format!("{}: {}", label, count), LineKind::Dim);
                }
            }
            let panel = match action {
                Some(BulkAction::Review) => panel.hint("a", "approve all").hint("r", "reject all"),
                Some(BulkAction::Assign) => panel
                    .line(format!("Type: {}", leave_type.label()))
                    .hint("t", "type")
                    .hint("Enter", "assign"),
                Some(BulkAction::Modify) => panel.hint("Enter", "open request"),
                None => panel.styled("Mixed selection: no bulk action", LineKind::Error),
            };
            panel.hint("Esc", "close")
        }

        Panel::CraEdit { cell, category } => {
            let current = cell
                .day
                .data
                .as_ref()
                .map_or_else(|| "empty".to_string(), |entry| entry.value.to_string());
            PanelWidget::new("Activity")
                .styled(cell.entity.full_name(), LineKind::Heading)
                .line(cell.day.date.format("%A %d/%m/%Y").to_string())
                .line(format!("Current: {}", current))
                .line(format!("Leave: {}", category_label(*category)))
                .hint("1", "full")
                .hint("h", "half")
                .hint("0", "clear")
                .hint("l", "leave")
                .hint("Enter", "apply")
        }

        Panel::CraBulk { cells, category } => PanelWidget::new("Activity selection")
            .styled(format!("{} editable day(s)", cells.len()), LineKind::Heading)
            .line(format!("Leave: {}", category_label(*category)))
            .hint("1", "full")
            .hint("h", "half")
            .hint("0", "clear")
            .hint("l", "leave")
            .hint("Enter", "apply"),

        Panel::CraSummary { summary, employee } => {
            let mut panel = PanelWidget::new("Monthly summary")
                .styled(
                    format!(
                        "{} · {} {}",
                        employee,
                        month_name(summary.month).unwrap_or_default(),
                        summary.year
                    ),
                    LineKind::Heading,
                )
                .line(format!("Working days: {}", summary.planned_days))
                .line(format!("Worked: {}", summary.worked_days))
                .line(format!("Leave: {}", summary.leave_days()));
            for (category, days) in &summary.leaves_by_category {
                panel = panel.styled(format!("  {}: {}", category.label(), days), LineKind::Dim);
            }
            let missing = summary.missing_days();
            if missing > 0.0 {
                panel = panel.styled(format!("Missing: {}", missing), LineKind::Error);
            }
            panel.hint("Esc", "close")
        }
    };
    Some(widget)
}
