//! End-to-end properties of the conversion, lunar, and seasonal stack.

use chrono::NaiveDate;
use natural13::{
    batch_convert, batch_lunar_phases, calendar, date_math, lunar_phase, seasonal_context,
    to_gregorian, to_natural13, Season, SYNODIC_MONTH,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

#[test]
fn round_trip_1900_to_2100() {
    let mut date = ymd(1900, 1, 1);
    let end = ymd(2100, 12, 31);
    while date <= end {
        let n = to_natural13(date);
        assert_eq!(
            to_gregorian(&n).unwrap(),
            date,
            "round trip failed for {date} -> {n:?}"
        );
        date = date.succ_opt().unwrap();
    }
}

#[test]
fn natural_year_day_counts() {
    for year in 1900..=2100 {
        let total: u32 = (1..=13)
            .map(|m| calendar::days_in_month(m, date_math::is_leap_year(year)))
            .sum();
        assert_eq!(total, date_math::days_in_year(year));

        // Walking every day of the natural year visits each month/day
        // slot exactly once, ending on the last day of month 13.
        let start = ymd(year - 1, 12, 21);
        let n = to_natural13(start);
        assert_eq!((n.year, n.month, n.day), (year, 1, 1));
        let last = start + chrono::Days::new(u64::from(total - 1));
        let n = to_natural13(last);
        assert_eq!(
            (n.year, n.month, n.day),
            (year, 13, calendar::days_in_month(13, date_math::is_leap_year(year)))
        );
    }
}

#[test]
fn month_thirteen_tracks_leap_years() {
    assert_eq!(calendar::days_in_month(13, false), 29);
    assert_eq!(calendar::days_in_month(13, true), 30);
    for m in 1..=12 {
        assert_eq!(calendar::days_in_month(m, true), 28);
    }
}

#[test]
fn lunar_age_never_jumps() {
    let mut prev = lunar_phase(ymd(1900, 1, 1)).age;
    let mut date = ymd(1900, 1, 2);
    let end = ymd(1902, 1, 1);
    while date <= end {
        let age = lunar_phase(date).age;
        let step = (age - prev).rem_euclid(SYNODIC_MONTH);
        assert!(step < 2.0, "age jumped by {step} at {date}");
        prev = age;
        date = date.succ_opt().unwrap();
    }
}

#[test]
fn full_moon_fifteen_days_after_reference() {
    // Reference new moon is 2000-01-06; mid-cycle lands near Jan 21.
    let p = lunar_phase(ymd(2000, 1, 21));
    assert_eq!(p.phase.name(), "Full Moon");
    assert!(p.illumination > 99.0);
}

#[test]
fn batch_results_equal_single_conversions() {
    let d = ymd(2025, 4, 9);
    let batch = batch_convert(&[d, d, d]);
    assert_eq!(batch, vec![to_natural13(d); 3]);

    let phases = batch_lunar_phases(&[d, d]);
    assert_eq!(phases[0], lunar_phase(d));
    assert_eq!(phases[1], phases[0]);
}

#[test]
fn month_grid_batch() {
    init_tracing();
    // A 6x7 month grid, with leading/trailing cells from the adjacent
    // months, exactly as a calendar view requests it.
    let first_cell = ymd(2025, 4, 27); // Sunday-start grid for May 2025
    let grid: Vec<NaiveDate> = (0..42)
        .map(|i| first_cell + chrono::Days::new(i))
        .collect();
    let converted = batch_convert(&grid);
    assert_eq!(converted.len(), 42);
    for (date, n) in grid.iter().zip(&converted) {
        assert_eq!(to_gregorian(n).unwrap(), *date);
    }
}

#[test]
fn solstice_context() {
    let ctx = seasonal_context(ymd(2025, 12, 21));
    assert_eq!(ctx.season, Season::Winter);
    assert_eq!(ctx.solar_term.as_deref(), Some("Winter Solstice"));
}

#[test]
fn plain_day_has_no_solar_term() {
    let ctx = seasonal_context(ymd(2025, 7, 10));
    assert_eq!(ctx.season, Season::Summer);
    assert_eq!(ctx.solar_term, None);
}
