//! Visible calendar periods (a full year or a single month)

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const MONTHS_PER_YEAR: usize = 12;

pub const MONTH_NAMES: [&str; MONTHS_PER_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Weekday labels indexed by day of week (0 = Sunday)
pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Layout of the grid's day axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Year,
    Month,
}

/// Range of days materialized by the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    Year(i32),
    /// `month` is 1-based
    Month { year: i32, month: u32 },
}

impl Period {
    pub fn year(&self) -> i32 {
        match self {
            Period::Year(year) => *year,
            Period::Month { year, .. } => *year,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Period::Year(_) => None,
            Period::Month { month, .. } => Some(*month),
        }
    }

    pub fn view_mode(&self) -> ViewMode {
        match self {
            Period::Year(_) => ViewMode::Year,
            Period::Month { .. } => ViewMode::Month,
        }
    }

    /// Period of `mode` containing `date`
    pub fn containing(date: NaiveDate, mode: ViewMode) -> Self {
        match mode {
            ViewMode::Year => Period::Year(date.year()),
            ViewMode::Month => Period::Month {
                year: date.year(),
                month: date.month(),
            },
        }
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Year(year) => NaiveDate::from_ymd_opt(year, 12, 31),
            Period::Month { year, month } => {
                days_in_month(year, month).and_then(|d| NaiveDate::from_ymd_opt(year, month, d))
            }
        }
    }

    /// Number of days in the period (0 for an ill-formed month)
    pub fn len_days(&self) -> usize {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => ((last - first).num_days() + 1) as usize,
            _ => 0,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => first <= date && date <= last,
            _ => false,
        }
    }

    /// The period immediately before this one
    pub fn previous(&self) -> Self {
        match *self {
            Period::Year(year) => Period::Year(year - 1),
            Period::Month { year, month: 1 } => Period::Month { year: year - 1, month: 12 },
            Period::Month { year, month } => Period::Month { year, month: month - 1 },
        }
    }

    /// The period immediately after this one
    pub fn next(&self) -> Self {
        match *self {
            Period::Year(year) => Period::Year(year + 1),
            Period::Month { year, month: 12 } => Period::Month { year: year + 1, month: 1 },
            Period::Month { year, month } => Period::Month { year, month: month + 1 },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Period::Year(year) => write!(f, "{}", year),
            Period::Month { year, month } => {
                let name = month_name(month).unwrap_or("?");
                write!(f, "{} {}", name, year)
            }
        }
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    (1..=12)
        .contains(&month)
        .then(|| MONTH_NAMES[(month - 1) as usize])
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next - first).num_days() as u32)
}

/// Day counts of every month of `year`, January first
pub fn month_lengths(year: i32) -> [u32; MONTHS_PER_YEAR] {
    let mut lengths = [0; MONTHS_PER_YEAR];
    for (i, len) in lengths.iter_mut().enumerate() {
        *len = days_in_month(year, i as u32 + 1).unwrap_or(0);
    }
    lengths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_in_month_leap_years() {
        assert_eq!(days_in_month(2024, 2), Some(29));
        assert_eq!(days_in_month(2023, 2), Some(28));
        assert_eq!(days_in_month(1900, 2), Some(28));
        assert_eq!(days_in_month(2000, 2), Some(29));
        assert_eq!(days_in_month(2024, 12), Some(31));
        assert_eq!(days_in_month(2024, 13), None);
    }

    #[test]
    fn test_month_lengths_sum_to_year() {
        assert_eq!(month_lengths(2024).iter().sum::<u32>(), 366);
        assert_eq!(month_lengths(2025).iter().sum::<u32>(), 365);
    }

    #[test]
    fn test_period_bounds() {
        let feb = Period::Month { year: 2024, month: 2 };
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(feb.len_days(), 29);
        assert_eq!(Period::Year(2023).len_days(), 365);
        assert_eq!(Period::Month { year: 2024, month: 0 }.len_days(), 0);
    }

    #[test]
    fn test_period_navigation_wraps_years() {
        let jan = Period::Month { year: 2025, month: 1 };
        assert_eq!(jan.previous(), Period::Month { year: 2024, month: 12 });
        assert_eq!(jan.previous().next(), jan);
        assert_eq!(Period::Year(2025).next(), Period::Year(2026));
    }

    #[test]
    fn test_containing() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 9).unwrap();
        assert_eq!(Period::containing(date, ViewMode::Year), Period::Year(2025));
        assert_eq!(
            Period::containing(date, ViewMode::Month),
            Period::Month { year: 2025, month: 6 }
        );
        assert!(Period::Year(2025).contains(date));
        assert!(!Period::Month { year: 2025, month: 5 }.contains(date));
    }

    #[test]
    fn test_display() {
        assert_eq!(Period::Year(2025).to_string(), "2025");
        assert_eq!(Period::Month { year: 2025, month: 3 }.to_string(), "March 2025");
    }
}
