//! Gregorian ↔ Natural13 conversion.
//!
//! Natural13 is a fixed artificial calendar: twelve 28-day months plus a
//! 13th month of 29 days (30 in leap years). Natural13 year Y begins on
//! Gregorian December 21 of year Y-1, the date nearest the winter
//! solstice. That anchor is a fixed design reference, not an ephemeris
//! result, and must not drift.

use chrono::{Datelike, Days, NaiveDate};

use crate::date_math;
use crate::error::CalendarError;

/// Days in each of months 1..=12. Month 13 absorbs the remainder.
pub const STANDARD_MONTH_DAYS: u32 = 28;

/// Gregorian month/day the Natural13 year starts on.
pub const YEAR_START: (u32, u32) = (12, 21);

/// Fixed month names, month 1 first. Reference data, deliberately not
/// localized here.
pub const MONTH_NAMES: [&str; 13] = [
    "Wolf Moon",
    "Snow Moon",
    "Worm Moon",
    "Pink Moon",
    "Flower Moon",
    "Strawberry Moon",
    "Buck Moon",
    "Sturgeon Moon",
    "Harvest Moon",
    "Hunter's Moon",
    "Beaver Moon",
    "Cold Moon",
    "Long Night Moon",
];

/// A date in the Natural13 calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Natural13Date {
    pub year: i32,
    /// 1..=13.
    pub month: u32,
    /// 1..=28 for months 1..=12; 1..=29 (30 in leap years) for month 13.
    pub day: u32,
    pub month_name: &'static str,
    /// Leap status of the Natural13 year, which controls month 13's
    /// length. Matches the Gregorian leap rule for the same year number.
    pub is_leap_year: bool,
}

impl Natural13Date {
    /// 1-indexed day within the Natural13 year.
    pub fn day_of_year(&self) -> u32 {
        STANDARD_MONTH_DAYS * (self.month - 1) + self.day
    }
}

impl std::fmt::Display for Natural13Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}, {}", self.month_name, self.day, self.year)
    }
}

/// Name of Natural13 month `month` (1..=13).
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get((month as usize).wrapping_sub(1)).copied()
}

/// Last valid day of `month` in a Natural13 year with the given leap
/// status.
pub fn days_in_month(month: u32, leap: bool) -> u32 {
    if month == 13 {
        if leap {
            30
        } else {
            29
        }
    } else {
        STANDARD_MONTH_DAYS
    }
}

/// Total days in Natural13 year `year` (365 or 366, same as Gregorian).
pub fn days_in_natural_year(year: i32) -> u32 {
    date_math::days_in_year(year)
}

/// Gregorian date the given Natural13 year starts on: December 21 of the
/// previous Gregorian year.
fn year_anchor(natural_year: i32) -> NaiveDate {
    // Dec 21 exists in every year; the unwrap cannot fire.
    NaiveDate::from_ymd_opt(natural_year - 1, YEAR_START.0, YEAR_START.1).unwrap()
}

/// Convert a Gregorian date to its Natural13 equivalent. Total: every
/// `NaiveDate` has exactly one Natural13 representation.
pub fn to_natural13(date: NaiveDate) -> Natural13Date {
    let natural_year = if (date.month(), date.day()) >= YEAR_START {
        date.year() + 1
    } else {
        date.year()
    };
    let ordinal = date_math::days_between(year_anchor(natural_year), date) as u32 + 1;
    let leap = date_math::is_leap_year(natural_year);

    // Walk the month table; a day-of-year landing exactly on a boundary
    // belongs to the new month (inclusive-low).
    let mut month = 1;
    let mut elapsed = 0;
    loop {
        let len = days_in_month(month, leap);
        if ordinal <= elapsed + len || month == 13 {
            break;
        }
        elapsed += len;
        month += 1;
    }

    Natural13Date {
        year: natural_year,
        month,
        day: ordinal - elapsed,
        month_name: MONTH_NAMES[(month - 1) as usize],
        is_leap_year: leap,
    }
}

/// Validating entry point for raw year/month/day triples.
pub fn to_natural13_ymd(year: i32, month: u32, day: u32) -> Result<Natural13Date, CalendarError> {
    let date = NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(CalendarError::InvalidGregorianDate { year, month, day })?;
    Ok(to_natural13(date))
}

/// Convert a Natural13 date back to Gregorian. Fails with
/// [`CalendarError::InvalidNatural13Date`] when month or day are out of
/// bounds for the date's year.
pub fn to_gregorian(date: &Natural13Date) -> Result<NaiveDate, CalendarError> {
    let leap = date_math::is_leap_year(date.year);
    if !(1..=13).contains(&date.month) {
        return Err(CalendarError::InvalidNatural13Date {
            month: date.month,
            day: date.day,
            max_day: 0,
        });
    }
    let max_day = days_in_month(date.month, leap);
    if date.day == 0 || date.day > max_day {
        return Err(CalendarError::InvalidNatural13Date {
            month: date.month,
            day: date.day,
            max_day,
        });
    }
    let ordinal = STANDARD_MONTH_DAYS * (date.month - 1) + date.day;
    // Anchor + offset stays well inside chrono's date range.
    Ok(year_anchor(date.year) + Days::new(u64::from(ordinal - 1)))
}

/// Construct a validated Natural13 date from raw parts.
pub fn natural13_from_parts(year: i32, month: u32, day: u32) -> Result<Natural13Date, CalendarError> {
    let candidate = Natural13Date {
        year,
        month,
        day,
        month_name: month_name(month).unwrap_or(""),
        is_leap_year: date_math::is_leap_year(year),
    };
    // Bounds checking lives in to_gregorian; reuse it.
    to_gregorian(&candidate)?;
    Ok(candidate)
}
