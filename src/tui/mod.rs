// Module declarations
pub mod widgets;

pub mod action;
pub mod capture;
pub mod effects;
pub mod error;
pub mod keys;
pub mod layout;
pub mod mouse;
pub mod reducer;
pub mod reducers;
pub mod renderer;
pub mod runtime;
pub mod state;

#[cfg(test)]
pub mod testing;


pub use action::{Action, PanelCommand};
pub use effects::{DataEffects, Effect};
pub use error::{TuiError, TuiResult};
pub use keys::key_to_action;
pub use reducer::reduce;
pub use runtime::Runtime;
pub use state::{AppState, Panel};

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::calendar::ListenerRegistry;
use crate::config::Config;
use crate::data_provider::CalendarDataProvider;
use capture::MouseCaptureGuard;
use mouse::PointerRouter;

/// Main entry point for TUI mode
pub async fn run(provider: Arc<dyn CalendarDataProvider>, config: Config) -> TuiResult<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let capture = MouseCaptureGuard::new()?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, provider, config).await;

    // Restore terminal
    drop(capture);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    provider: Arc<dyn CalendarDataProvider>,
    config: Config,
) -> TuiResult<()> {
    let data_effects = Arc::new(DataEffects::new(provider));
    let initial_state = AppState::new(config, Local::now().date_naive());
    let mut runtime = Runtime::new(initial_state, data_effects);

    // Releases and drag moves reach the grid wherever they happen on screen
    let registry = ListenerRegistry::new();
    let listener_tx = runtime.action_sender();
    let _listener = registry.subscribe(move |event| {
        let _ = listener_tx.send(Action::GlobalPointer(*event));
    });
    let mut router = PointerRouter::new();

    let (width, height) = crossterm::terminal::size()?;
    runtime.dispatch(Action::Resize { width, height });
    runtime.dispatch(Action::GoToToday);
    runtime.dispatch(Action::RefreshData);

    loop {
        // Process any actions from effects FIRST (so data loads trigger re-render)
        let actions_processed = runtime.process_actions();
        if actions_processed > 0 {
            tracing::debug!("LOOP: Processed {} actions", actions_processed);
        }

        terminal.draw(|f| renderer::render(runtime.state(), f.area(), f.buffer_mut()))?;

        if actions_processed > 0 {
            continue;
        }

        let mut actions = router.flush(runtime.state(), Instant::now());
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    actions.extend(key_to_action(key, runtime.state()))
                }
                Event::Mouse(mouse) => actions.extend(router.route(mouse, runtime.state(), &registry, Instant::now())),
                Event::Resize(width, height) => actions.push(Action::Resize { width, height }),
                _ => {}
            }
        }

        for action in actions {
            let quit = action == Action::Quit;
            runtime.dispatch(action);
            if quit {
                tracing::info!("Quitting");
                return Ok(());
            }
        }
    }
}
