//! Low-level Gregorian day arithmetic shared by every other module.
//!
//! Everything here is a pure, total function over well-formed calendar
//! dates. Conversions and lunar math build on two primitives: ordinal
//! day-of-year and the Julian Day Number.

use chrono::{Datelike, NaiveDate};

/// Days in each Gregorian month of a common year.
const MONTH_LENGTHS: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian leap rule: divisible by 4, not by 100 unless by 400.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// 365 for common years, 366 for leap years.
pub fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) {
        366
    } else {
        365
    }
}

/// Length of a Gregorian month, accounting for February in leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if month == 2 && is_leap_year(year) {
        29
    } else {
        MONTH_LENGTHS[(month - 1) as usize]
    }
}

/// 1-indexed day of year, 1..=366.
pub fn day_of_year(date: NaiveDate) -> u32 {
    let (year, month, day) = (date.year(), date.month(), date.day());
    let mut ordinal = day;
    for m in 1..month {
        ordinal += days_in_month(year, m);
    }
    ordinal
}

/// Inverse of [`day_of_year`]: ordinal 1..=days_in_year maps back to a
/// (month, day) pair. `None` if the ordinal is out of range for `year`.
pub fn month_day_from_ordinal(year: i32, ordinal: u32) -> Option<(u32, u32)> {
    if ordinal == 0 || ordinal > days_in_year(year) {
        return None;
    }
    let mut remaining = ordinal;
    for month in 1..=12 {
        let len = days_in_month(year, month);
        if remaining <= len {
            return Some((month, remaining));
        }
        remaining -= len;
    }
    None
}

/// Julian Day Number for a Gregorian date (integer-arithmetic form).
///
/// Signed differences between JDNs give elapsed calendar days, which is
/// what the lunar age calculation runs on.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let (year, month, day) = (year as i64, month as i64, day as i64);
    let a = (14 - month) / 12;
    let y = year + 4800 - a;
    let m = month + 12 * a - 3;
    day + ((153 * m + 2) / 5) + 365 * y + y / 4 - y / 100 + y / 400 - 32045
}

/// Signed whole days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    julian_day_number(to.year(), to.month(), to.day())
        - julian_day_number(from.year(), from.month(), from.day())
}
