//! Calendar week handling.
//!
//! Weeks follow the ISO-8601 rule: week 1 is the week containing the year's
//! first Thursday, so the last days of December can belong to week 1 of the
//! following year and the first days of January to week 52 or 53 of the
//! previous one. Every time series in this crate is keyed by these weeks.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::error::SimulationError;

/// Identifier of a single calendar week.
///
/// Ordering is lexicographic on (year, week) and therefore chronological,
/// which lets the engine iterate week ranges with plain comparisons. The
/// `Display` form is the zero-padded `YYYY/WW` used in data files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarWeek {
    year: i32,
    week: u32,
}

impl CalendarWeek {
    /// Create a week from a (year, ISO week number) pair.
    ///
    /// The pair is not range-checked; weeks derived from dates or parsed
    /// from strings are always valid.
    #[must_use]
    pub const fn new(year: i32, week: u32) -> Self {
        Self { year, week }
    }

    /// The ISO week containing the given date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// The ISO week-numbering year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The week number within the year (1..=53).
    #[must_use]
    pub const fn week(&self) -> u32 {
        self.week
    }

    /// Monday of this week.
    #[must_use]
    pub fn monday(&self) -> NaiveDate {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon).unwrap()
    }

    /// Date of a weekday within this week; 1 = Monday .. 7 = Sunday.
    ///
    /// 0 is the Sunday before this week and 8 the Monday after it, which
    /// pins a value exactly onto a week boundary.
    #[must_use]
    pub fn weekday_date(&self, weekday: i64) -> NaiveDate {
        self.monday() + Duration::days(weekday - 1)
    }

    /// The week `weeks` after this one.
    ///
    /// Implemented by shifting the Monday date by whole weeks and
    /// converting back, which stays correct across 52/53-week years.
    #[must_use]
    pub fn weeks_after(&self, weeks: i64) -> Self {
        Self::from_date(self.monday() + Duration::weeks(weeks))
    }

    /// The week `weeks` before this one.
    #[must_use]
    pub fn weeks_before(&self, weeks: i64) -> Self {
        self.weeks_after(-weeks)
    }

    /// The following week.
    #[must_use]
    pub fn next(&self) -> Self {
        self.weeks_after(1)
    }

    /// The preceding week.
    #[must_use]
    pub fn prev(&self) -> Self {
        self.weeks_before(1)
    }
}

impl fmt::Display for CalendarWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.week)
    }
}

impl FromStr for CalendarWeek {
    type Err = SimulationError;

    /// Parse the `YYYY/WW` form, validating the week number against the
    /// year's actual week count.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SimulationError::InvalidWeek(s.to_string());
        let (year, week) = s.split_once('/').ok_or_else(invalid)?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        if NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).is_none() {
            return Err(invalid());
        }
        Ok(Self { year, week })
    }
}
