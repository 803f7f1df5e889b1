//! Lunar phase from a fixed synodic-month approximation.
//!
//! Age is elapsed days since a reference new moon, reduced modulo the
//! mean synodic month. This is deliberately not ephemeris-grade: real
//! phases wobble around the mean by several hours due to orbital
//! perturbations, and that error is accepted.

use chrono::NaiveDate;

use crate::date_math;

/// Mean synodic month, in days.
pub const SYNODIC_MONTH: f64 = 29.530589;

/// Reference new moon: 2000-01-06 (the first new moon of 2000), taken at
/// calendar-day precision.
pub const REFERENCE_NEW_MOON: (i32, u32, u32) = (2000, 1, 6);

/// The eight principal phases, in cycle order from new.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    New,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    Full,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
}

impl Phase {
    const ORDER: [Phase; 8] = [
        Phase::New,
        Phase::WaxingCrescent,
        Phase::FirstQuarter,
        Phase::WaxingGibbous,
        Phase::Full,
        Phase::WaningGibbous,
        Phase::LastQuarter,
        Phase::WaningCrescent,
    ];

    /// Phase for a lunar age in `[0, SYNODIC_MONTH)`. Eight equal bins;
    /// an age exactly on a bin boundary belongs to the later phase.
    pub fn from_age(age: f64) -> Self {
        let bin = (age / (SYNODIC_MONTH / 8.0)) as usize;
        Self::ORDER[bin.min(7)]
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::New => "New Moon",
            Phase::WaxingCrescent => "Waxing Crescent",
            Phase::FirstQuarter => "First Quarter",
            Phase::WaxingGibbous => "Waxing Gibbous",
            Phase::Full => "Full Moon",
            Phase::WaningGibbous => "Waning Gibbous",
            Phase::LastQuarter => "Last Quarter",
            Phase::WaningCrescent => "Waning Crescent",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Phase::New => "🌑",
            Phase::WaxingCrescent => "🌒",
            Phase::FirstQuarter => "🌓",
            Phase::WaxingGibbous => "🌔",
            Phase::Full => "🌕",
            Phase::WaningGibbous => "🌖",
            Phase::LastQuarter => "🌗",
            Phase::WaningCrescent => "🌘",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lunar state for a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LunarPhase {
    pub phase: Phase,
    /// Illuminated fraction of the disc, percent in [0, 100].
    pub illumination: f64,
    /// Days into the synodic cycle, in [0, SYNODIC_MONTH).
    pub age: f64,
}

fn reference_date() -> NaiveDate {
    let (y, m, d) = REFERENCE_NEW_MOON;
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Lunar phase for `date`. Dates before the reference epoch are fine:
/// the signed elapsed-day count is reduced with a Euclidean remainder.
pub fn lunar_phase(date: NaiveDate) -> LunarPhase {
    let elapsed = date_math::days_between(reference_date(), date) as f64;
    let age = elapsed.rem_euclid(SYNODIC_MONTH);
    let illumination =
        (50.0 * (1.0 - (std::f64::consts::TAU * age / SYNODIC_MONTH).cos())).clamp(0.0, 100.0);
    LunarPhase {
        phase: Phase::from_age(age),
        illumination,
        age,
    }
}
