use anyhow::Result;

use super::{format_header, resolve_year};
use crate::calendar::{HolidayCalculator, YearHolidays};

/// Print the public holidays of a year
pub fn run(year: Option<i32>) -> Result<()> {
    let year = resolve_year(year)?;
    let holidays = HolidayCalculator::new().holidays_for_year(year);
    print!("{}", format_holidays(&holidays));
    Ok(())
}

pub fn format_holidays(holidays: &YearHolidays) -> String {
    let mut output = format_header(&format!("Public holidays {}", holidays.year()));
    for holiday in holidays.iter() {
        output.push_str(&format!(
            "{}  {:<9}  {}\n",
            holiday.date.format("%Y-%m-%d"),
            holiday.date.format("%A"),
            holiday.kind.label()
        ));
    }
    output
}
