/// Mouse event to action mapping
///
/// Terminal mouse reports become grid gestures. Releases and drag moves are
/// first broadcast through the [`ListenerRegistry`], which is how a drag
/// started in the grid still finishes when the button comes up over the
/// header, the scrollbar or a popup. Everything else is hit-tested against
/// the current screen layout.
use std::time::{Duration, Instant};

use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::trace;

use super::action::Action;
use super::layout::{hit_test, HitTarget, Viewport};
use super::reducers::screens::screen_layout;
use super::state::AppState;
use crate::calendar::{GlobalPointerEvent, GridPoint, ListenerRegistry, Modifiers};
use crate::config::AppMode;

/// Two clicks on the same cell within this window make a double click
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(400);

#[derive(Debug, Default)]
struct ClickTracker {
    /// Cell under the last button press, until release
    pressed: Option<GridPoint>,
    /// The pointer left the pressed cell before release
    moved: bool,
    last_click: Option<(GridPoint, Instant)>,
    /// Plain activity click waiting for the double click window to close
    deferred: Option<(GridPoint, Instant)>,
}

/// Stateful translator from terminal mouse events to actions
#[derive(Debug, Default)]
pub struct PointerRouter {
    clicks: ClickTracker,
}

fn modifiers(mods: KeyModifiers) -> Modifiers {
    Modifiers {
        // Many terminals keep Ctrl+click for themselves; Alt works as well
        ctrl: mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT),
        shift: mods.contains(KeyModifiers::SHIFT),
    }
}

fn viewport(state: &AppState) -> Viewport {
    match state.mode {
        AppMode::Leave => Viewport::of(&state.leave.grid, state.leave.row_offset),
        AppMode::Cra => Viewport::of(&state.cra.grid, state.cra.row_offset),
    }
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(
        &mut self,
        event: MouseEvent,
        state: &AppState,
        registry: &ListenerRegistry,
        now: Instant,
    ) -> Vec<Action> {
        let layout = screen_layout(state);
        let viewport = viewport(state);
        let target = hit_test(&layout, &viewport, event.column, event.row);
        let mods = modifiers(event.modifiers);
        trace!("MOUSE: {:?} at {},{} -> {:?}", event.kind, event.column, event.row, target);

        match event.kind {
            MouseEventKind::Up(MouseButton::Left) => {
                registry.dispatch(&GlobalPointerEvent::Release { ctrl: mods.ctrl });
                self.release(target, state, mods, now)
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                registry.dispatch(&GlobalPointerEvent::Move {
                    x: f64::from(event.column),
                    y: f64::from(event.row),
                });
                match target {
                    HitTarget::Cell(point) => {
                        if self.clicks.pressed != Some(point) {
                            self.clicks.moved = true;
                        }
                        self.enter(point, state)
                    }
                    _ => {
                        self.clicks.moved = true;
                        Vec::new()
                    }
                }
            }
            MouseEventKind::Down(MouseButton::Left) => self.press(target, state, layout.strip_width(), event.column),
            MouseEventKind::Down(MouseButton::Right) => match target {
                HitTarget::Name(row) | HitTarget::Cell(GridPoint { row, .. }) if !state.panel.is_open() => {
                    vec![Action::ExportRow(row)]
                }
                _ => Vec::new(),
            },
            MouseEventKind::Moved => match target {
                HitTarget::Cell(point) => self.enter(point, state),
                _ if state.hover().is_some() => vec![Action::PointerLeave],
                _ => Vec::new(),
            },
            MouseEventKind::ScrollDown if mods.shift => vec![Action::ScrollRight],
            MouseEventKind::ScrollUp if mods.shift => vec![Action::ScrollLeft],
            MouseEventKind::ScrollDown => vec![Action::ScrollRows(1)],
            MouseEventKind::ScrollUp => vec![Action::ScrollRows(-1)],
            MouseEventKind::ScrollRight => vec![Action::ScrollRight],
            MouseEventKind::ScrollLeft => vec![Action::ScrollLeft],
            _ => Vec::new(),
        }
    }

    fn enter(&self, point: GridPoint, state: &AppState) -> Vec<Action> {
        if state.hover() == Some(point) {
            Vec::new()
        } else {
            vec![Action::PointerEnter(point)]
        }
    }

    fn press(&mut self, target: HitTarget, state: &AppState, strip_width: u16, column: u16) -> Vec<Action> {
        self.clicks.pressed = None;
        self.clicks.moved = false;
        if state.panel.is_open() {
            return vec![Action::ClosePanel];
        }
        match target {
            HitTarget::Cell(point) => {
                self.clicks.pressed = Some(point);
                vec![Action::PointerDown(point)]
            }
            HitTarget::Thumb => vec![Action::ThumbPress { x: column }],
            HitTarget::Track { before_thumb } => {
                let page = f64::from(strip_width);
                vec![Action::ScrollBy(if before_thumb { -page } else { page })]
            }
            HitTarget::PreviousArrow => vec![Action::PreviousMonth],
            HitTarget::NextArrow => vec![Action::NextMonth],
            HitTarget::Name(_) | HitTarget::Header(_) | HitTarget::Outside => Vec::new(),
        }
    }

    /// Report a deferred activity click once no second click can follow
    ///
    /// A plain click on the activity grid edits the cell, so it is held back
    /// until the double click window has passed. Called from the event loop.
    pub fn flush(&mut self, state: &AppState, now: Instant) -> Vec<Action> {
        match self.clicks.deferred {
            Some((_, at)) if now.duration_since(at) > DOUBLE_CLICK_WINDOW => self.take_deferred(state),
            _ => Vec::new(),
        }
    }

    fn take_deferred(&mut self, state: &AppState) -> Vec<Action> {
        match self.clicks.deferred.take() {
            Some((point, _)) if !state.panel.is_open() => vec![Action::CellClick {
                point,
                mods: Modifiers::NONE,
            }],
            _ => Vec::new(),
        }
    }

    /// A press and release on the same cell is a click; a second click on
    /// that cell inside the window is a double click instead.
    fn release(&mut self, target: HitTarget, state: &AppState, mods: Modifiers, now: Instant) -> Vec<Action> {
        let pressed = self.clicks.pressed.take();
        let moved = std::mem::take(&mut self.clicks.moved);
        let point = match (pressed, target) {
            (Some(pressed), HitTarget::Cell(point)) if pressed == point && !moved => point,
            _ => return Vec::new(),
        };
        if state.panel.is_open() {
            return Vec::new();
        }

        let repeated = self
            .clicks
            .last_click
            .map_or(false, |(last, at)| last == point && now.duration_since(at) <= DOUBLE_CLICK_WINDOW);
        if repeated {
            self.clicks.last_click = None;
            self.clicks.deferred = None;
            return vec![Action::CellDoubleClick(point)];
        }

        // A click elsewhere settles the one still waiting
        let mut actions = self.take_deferred(state);
        self.clicks.last_click = Some((point, now));
        if state.mode == AppMode::Cra && mods == Modifiers::NONE {
            self.clicks.deferred = Some((point, now));
        } else {
            actions.push(Action::CellClick { point, mods });
        }
        actions
    }
}
