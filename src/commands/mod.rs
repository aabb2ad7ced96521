pub mod days;
pub mod holidays;

use anyhow::{ensure, Result};
use chrono::{Datelike, Local};

/// Year argument, defaulting to the current year
///
/// Only years of the Gregorian calendar are accepted.
pub fn resolve_year(year: Option<i32>) -> Result<i32> {
    let year = year.unwrap_or_else(|| Local::now().year());
    ensure!(
        (1583..=9999).contains(&year),
        "Invalid year {}. Use a Gregorian year between 1583 and 9999",
        year
    );
    Ok(year)
}

/// Text followed by an underline of the same width
pub fn format_header(text: &str) -> String {
    format!("{}\n{}\n", text, "─".repeat(text.chars().count()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_year() {
        assert_eq!(resolve_year(Some(2025)).unwrap(), 2025);
        assert!(resolve_year(None).is_ok());
        let err = resolve_year(Some(1200)).unwrap_err();
        assert!(err.to_string().contains("1200"));
    }

    #[test]
    fn test_format_header() {
        assert_eq!(format_header("Holidays 2025"), "Holidays 2025\n─────────────\n");
    }
}
