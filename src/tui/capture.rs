/// Terminal mouse capture tied to a scope
///
/// Capture is enabled when the guard is created and released when it is
/// dropped, including on early returns and panics unwinding through `run`.
use std::io;

use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tracing::{debug, warn};

pub struct MouseCaptureGuard {
    _private: (),
}

impl MouseCaptureGuard {
    pub fn new() -> io::Result<Self> {
        execute!(io::stdout(), EnableMouseCapture)?;
        debug!("MOUSE: capture enabled");
        Ok(Self { _private: () })
    }
}

impl Drop for MouseCaptureGuard {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
            warn!("MOUSE: failed to release capture: {}", e);
        } else {
            debug!("MOUSE: capture released");
        }
    }
}
