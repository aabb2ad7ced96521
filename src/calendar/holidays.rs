//! Public holiday computation
//!
//! Eight fixed-date holidays plus three movable feasts derived from Gregorian
//! Easter. Results are memoized per year in a cache owned by the calculator,
//! so every grid controller carries its own and can drop it at will.

use std::sync::Arc;

use cached::{Cached, UnboundCache};
use chrono::{Datelike, Duration, NaiveDate};
use tracing::trace;

/// Fixed holidays as (month, day, kind)
const FIXED_HOLIDAYS: [(u32, u32, HolidayKind); 8] = [
    (1, 1, HolidayKind::NewYear),
    (5, 1, HolidayKind::LabourDay),
    (5, 8, HolidayKind::VictoryDay),
    (7, 14, HolidayKind::NationalDay),
    (8, 15, HolidayKind::Assumption),
    (11, 1, HolidayKind::AllSaints),
    (11, 11, HolidayKind::Armistice),
    (12, 25, HolidayKind::Christmas),
];

/// Movable holidays as (days after Easter Sunday, kind)
const EASTER_OFFSETS: [(i64, HolidayKind); 3] = [
    (1, HolidayKind::EasterMonday),
    (39, HolidayKind::Ascension),
    (50, HolidayKind::WhitMonday),
];

/// Number of holidays produced for every year
pub const HOLIDAYS_PER_YEAR: usize = FIXED_HOLIDAYS.len() + EASTER_OFFSETS.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HolidayKind {
    NewYear,
    EasterMonday,
    LabourDay,
    VictoryDay,
    Ascension,
    WhitMonday,
    NationalDay,
    Assumption,
    AllSaints,
    Armistice,
    Christmas,
}

impl HolidayKind {
    pub fn label(&self) -> &'static str {
        match self {
            HolidayKind::NewYear => "New Year's Day",
            HolidayKind::EasterMonday => "Easter Monday",
            HolidayKind::LabourDay => "Labour Day",
            HolidayKind::VictoryDay => "Victory in Europe Day",
            HolidayKind::Ascension => "Ascension Day",
            HolidayKind::WhitMonday => "Whit Monday",
            HolidayKind::NationalDay => "National Day",
            HolidayKind::Assumption => "Assumption of Mary",
            HolidayKind::AllSaints => "All Saints' Day",
            HolidayKind::Armistice => "Armistice Day",
            HolidayKind::Christmas => "Christmas Day",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Holiday {
    pub date: NaiveDate,
    pub kind: HolidayKind,
}

/// Holidays of a single year, sorted by date
///
/// A movable feast may land on a fixed holiday (Ascension on May 1st in 2008),
/// in which case both entries are kept and the list still has
/// [`HOLIDAYS_PER_YEAR`] elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearHolidays {
    year: i32,
    holidays: Vec<Holiday>,
}

impl YearHolidays {
    /// Compute the holidays of `year` without any caching
    pub fn compute(year: i32) -> Self {
        let mut holidays: Vec<Holiday> = FIXED_HOLIDAYS
            .iter()
            .filter_map(|&(month, day, kind)| {
                NaiveDate::from_ymd_opt(year, month, day).map(|date| Holiday { date, kind })
            })
            .collect();

        if let Some(easter) = easter_sunday(year) {
            holidays.extend(EASTER_OFFSETS.iter().filter_map(|&(offset, kind)| {
                easter
                    .checked_add_signed(Duration::days(offset))
                    .map(|date| Holiday { date, kind })
            }));
        }

        holidays.sort();
        Self { year, holidays }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Holiday> {
        self.holidays.iter()
    }

    /// Dates only, in ascending order (a shared date appears twice)
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.holidays.iter().map(|h| h.date).collect()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.find(date).is_some()
    }

    /// First holiday falling on `date`
    pub fn find(&self, date: NaiveDate) -> Option<&Holiday> {
        let start = self.holidays.partition_point(|h| h.date < date);
        self.holidays.get(start).filter(|h| h.date == date)
    }
}

/// Gregorian Easter Sunday (anonymous Meeus/Jones/Butcher algorithm)
///
/// Exact for every Gregorian year from 1583. Returns `None` only when the
/// year lies outside chrono's representable range.
pub fn easter_sunday(year: i32) -> Option<NaiveDate> {
    let a = year.rem_euclid(19);
    let b = year.div_euclid(100);
    let c = year.rem_euclid(100);
    let d = b.div_euclid(4);
    let e = b.rem_euclid(4);
    let f = (b + 8).div_euclid(25);
    let g = (b - f + 1).div_euclid(3);
    let h = (19 * a + b - d - g + 15).rem_euclid(30);
    let i = c.div_euclid(4);
    let k = c.rem_euclid(4);
    let l = (32 + 2 * e + 2 * i - h - k).rem_euclid(7);
    let m = (a + 11 * h + 22 * l).div_euclid(451);
    let n = h + l - 7 * m + 114;
    let month = n.div_euclid(31);
    let day = n.rem_euclid(31) + 1;

    NaiveDate::from_ymd_opt(year, month as u32, day as u32)
}

/// Holiday lookup with a per-year memo
///
/// Entries are only ever added; [`HolidayCalculator::clear`] drops everything
/// and the next lookup recomputes.
pub struct HolidayCalculator {
    cache: UnboundCache<i32, Arc<YearHolidays>>,
}

impl HolidayCalculator {
    pub fn new() -> Self {
        Self {
            cache: UnboundCache::new(),
        }
    }

    pub fn holidays_for_year(&mut self, year: i32) -> Arc<YearHolidays> {
        Arc::clone(self.cache.cache_get_or_set_with(year, || {
            trace!("HOLIDAYS: computing holidays for {}", year);
            Arc::new(YearHolidays::compute(year))
        }))
    }

    pub fn is_holiday(&mut self, date: NaiveDate) -> bool {
        self.holidays_for_year(date.year()).contains(date)
    }

    pub fn holiday_on(&mut self, date: NaiveDate) -> Option<Holiday> {
        self.holidays_for_year(date.year()).find(date).copied()
    }

    pub fn clear(&mut self) {
        self.cache.cache_clear();
    }

    /// Number of years currently memoized
    pub fn cached_years(&self) -> usize {
        self.cache.cache_size()
    }
}

impl Default for HolidayCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HolidayCalculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayCalculator")
            .field("cached_years", &self.cached_years())
            .finish()
    }
}
