//! Day sequence for the visible period and its date → position index
//!
//! Positions are only meaningful for the period they were built under.
//! [`DateIndexer`] rebuilds synchronously whenever it is asked for another
//! period, so a stale index can never be read after a period change.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use super::holidays::{HolidayCalculator, HolidayKind};
use super::period::Period;

/// Calendar facts of one materialized day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayFacts {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday
    pub day_of_week: u32,
    pub is_weekend: bool,
    pub is_holiday: bool,
    pub holiday: Option<HolidayKind>,
}

impl DayFacts {
    pub fn new(date: NaiveDate, holidays: &mut HolidayCalculator) -> Self {
        let day_of_week = date.weekday().num_days_from_sunday();
        let holiday = holidays.holiday_on(date).map(|h| h.kind);
        Self {
            date,
            day_of_week,
            is_weekend: is_weekend(date),
            is_holiday: holiday.is_some(),
            holiday,
        }
    }

    /// Weekends and holidays are not editable by convention
    pub fn is_working_day(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday().num_days_from_sunday(), 0 | 6)
}

/// Contiguous ascending days of a period with a reverse lookup
#[derive(Debug, Clone)]
pub struct DaySequence {
    period: Period,
    dates: Vec<NaiveDate>,
    index: HashMap<NaiveDate, usize>,
}

impl DaySequence {
    pub fn build(period: Period) -> Self {
        let dates: Vec<NaiveDate> = match (period.first_day(), period.last_day()) {
            (Some(first), Some(last)) => first.iter_days().take_while(|d| *d <= last).collect(),
            _ => Vec::new(),
        };
        let index = dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        Self {
            period,
            dates,
            index,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        self.index.get(&date).copied()
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDate> {
        self.dates.get(index).copied()
    }

    /// Facts for every day of the sequence, in order
    pub fn facts(&self, holidays: &mut HolidayCalculator) -> Vec<DayFacts> {
        self.dates
            .iter()
            .map(|date| DayFacts::new(*date, holidays))
            .collect()
    }
}

/// Cache of the current [`DaySequence`]
#[derive(Debug, Default)]
pub struct DateIndexer {
    current: Option<DaySequence>,
}

impl DateIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sequence for `period`, rebuilding first if the cached one is for
    /// another period
    pub fn sequence_for(&mut self, period: Period) -> &DaySequence {
        let stale = self
            .current
            .as_ref()
            .map_or(true, |seq| seq.period() != period);
        if stale {
            debug!("DATES: building day sequence for {}", period);
            self.current = Some(DaySequence::build(period));
        }
        self.current.get_or_insert_with(|| DaySequence::build(period))
    }

    pub fn current(&self) -> Option<&DaySequence> {
        self.current.as_ref()
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }
}
