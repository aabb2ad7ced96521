/// Widget-based rendering infrastructure for TUI
///
/// Widgets are small, focused components that render straight into a ratatui
/// Buffer, so each can be tested in isolation against a test buffer.

#[cfg(test)]
pub mod testing;

pub mod calendar_grid;
pub use calendar_grid::CalendarGridWidget;

pub mod legend;
pub use legend::Legend;

pub mod nav_bar;
pub use nav_bar::NavBar;

pub mod panel;
pub use panel::{popup_area, PanelWidget};

pub mod status_bar;
pub use status_bar::{KeyHint, KeyHintStyle, StatusBar};

pub mod title_bar;
pub use title_bar::TitleBar;

use ratatui::{buffer::Buffer, layout::Rect};

use crate::config::ThemeConfig;

/// Core trait for renderable widgets
///
/// Widgets render themselves directly to a ratatui Buffer, avoiding string-based
/// intermediate representations. This enables:
/// - Direct styling without character position calculations
/// - Composability (widgets can contain other widgets)
/// - Testability (can render to test buffers)
///
/// # Object Safety
///
/// This trait is object-safe, meaning you can use trait objects to store
/// different widget types in collections.
pub trait RenderableWidget {
    /// Render this widget into the provided buffer
    ///
    /// # Arguments
    ///
    /// * `area` - The rectangular area to render into
    /// * `buf` - The buffer to write to
    /// * `theme` - Colours of cells, selection and errors
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &ThemeConfig);

    /// Get the preferred height of this widget
    ///
    /// Returns None if the widget can adapt to any height.
    fn preferred_height(&self) -> Option<u16> {
        None
    }

    /// Get the preferred width of this widget
    ///
    /// Returns None if the widget can adapt to any width.
    fn preferred_width(&self) -> Option<u16> {
        None
    }
}
