use anyhow::{Context, Result};
use chrono::Datelike;

use super::{format_header, resolve_year};
use crate::calendar::period::days_in_month;
use crate::calendar::{DayFacts, DaySequence, HolidayCalculator, Period};

/// Print the day sequence of a year or month with weekend and holiday flags
pub fn run(year: Option<i32>, month: Option<u32>) -> Result<()> {
    let year = resolve_year(year)?;
    let period = match month {
        Some(month) => {
            days_in_month(year, month).with_context(|| format!("Invalid month {}. Use 1-12", month))?;
            Period::Month { year, month }
        }
        None => Period::Year(year),
    };
    let facts = DaySequence::build(period).facts(&mut HolidayCalculator::new());
    print!("{}", format_days(period, &facts));
    Ok(())
}

pub fn format_days(period: Period, facts: &[DayFacts]) -> String {
    let mut output = format_header(&format!("Days of {}", period));
    for (index, day) in facts.iter().enumerate() {
        let flag = match (day.holiday, day.is_weekend) {
            (Some(kind), _) => kind.label(),
            (None, true) => "weekend",
            (None, false) => "",
        };
        let line = format!("{:>3}  {}  {}  {}", index, day.date.format("%Y-%m-%d"), day.date.weekday(), flag);
        output.push_str(line.trim_end());
        output.push('\n');
    }
    let working = facts.iter().filter(|d| d.is_working_day()).count();
    output.push_str(&format!("{} days, {} working days\n", facts.len(), working));
    output
}
