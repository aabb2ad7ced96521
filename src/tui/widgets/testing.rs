//! Rendering helpers shared by the widget tests

use ratatui::{buffer::Buffer, layout::Rect, style::Color};

use super::RenderableWidget;
use crate::config::ThemeConfig;

/// Built-in palette with a gold selection colour, easy to spot in assertions
pub fn test_theme() -> ThemeConfig {
    ThemeConfig {
        selection_fg: Color::Rgb(255, 200, 0),
        ..ThemeConfig::default()
    }
}

/// Render `widget` into a fresh `width` x `height` buffer
pub fn render_widget(widget: &impl RenderableWidget, width: u16, height: u16) -> Buffer {
    let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
    widget.render(buf.area, &mut buf, &test_theme());
    buf
}

/// Symbols of one buffer row, padding included
pub fn buffer_line(buf: &Buffer, line: u16) -> String {
    (0..buf.area().width).map(|x| buf[(x, line)].symbol()).collect()
}

/// Compare a whole row, printing both sides on mismatch
pub fn assert_buffer_line(buf: &Buffer, line: u16, expected: &str) {
    let actual = buffer_line(buf, line);
    assert_eq!(
        actual, expected,
        "\nLine {} mismatch:\nExpected: {}\nActual:   {}",
        line, expected, actual
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_dims_unfocused_selection() {
        let theme = test_theme();
        assert_eq!(theme.unfocused_selection_fg(), Color::Rgb(127, 100, 0));
    }

    #[test]
    fn test_buffer_line_keeps_wide_symbols() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 1));
        buf.set_string(0, 0, "◀ ▶", ratatui::style::Style::default());
        assert_eq!(buffer_line(&buf, 0), "◀ ▶   ");
    }
}
