//! Seasons, solar-term markers, and the composite seasonal context.
//!
//! Marker dates are fixed Gregorian anchors (Mar 20, Jun 21, Sep 22,
//! Dec 21 for the quarter points), the same reference dates the calendar
//! uses for its year start. Matching tolerance against a marker is ±1
//! calendar day.

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;

use crate::date_math;
use crate::lunar::{self, LunarPhase};

/// Matching window around a marker anchor, in days.
const MARKER_WINDOW_DAYS: i64 = 1;

/// Northern-hemisphere season, from the Gregorian month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    /// Season for a Gregorian month: 12,1,2 / 3,4,5 / 6,7,8 / 9,10,11.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            3 | 4 | 5 => Season::Spring,
            6 | 7 | 8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AstronomicalEvent {
    Solstice,
    Equinox,
}

/// How a marker is anchored to the Gregorian year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerTiming {
    /// A plain fixed calendar date.
    FixedDate { month: u32, day: u32 },
    /// A solstice or equinox, pinned to its fixed reference date rather
    /// than recomputed astronomically.
    Astronomical {
        event: AstronomicalEvent,
        month: u32,
        day: u32,
    },
}

impl MarkerTiming {
    fn anchor(&self) -> (u32, u32) {
        match *self {
            MarkerTiming::FixedDate { month, day } => (month, day),
            MarkerTiming::Astronomical { month, day, .. } => (month, day),
        }
    }
}

/// Immutable seasonal reference point.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalMarker {
    pub id: &'static str,
    pub name: &'static str,
    pub timing: MarkerTiming,
    pub description: &'static str,
}

lazy_static! {
    /// The eight markers of the solar year: four quarter points and four
    /// cross-quarter days.
    pub static ref SEASONAL_MARKERS: Vec<SeasonalMarker> = vec![
        SeasonalMarker {
            id: "winter-solstice",
            name: "Winter Solstice",
            timing: MarkerTiming::Astronomical {
                event: AstronomicalEvent::Solstice,
                month: 12,
                day: 21,
            },
            description: "Longest night; the Natural13 year turns over.",
        },
        SeasonalMarker {
            id: "imbolc",
            name: "Imbolc",
            timing: MarkerTiming::FixedDate { month: 2, day: 1 },
            description: "Cross-quarter day between winter solstice and spring equinox.",
        },
        SeasonalMarker {
            id: "spring-equinox",
            name: "Spring Equinox",
            timing: MarkerTiming::Astronomical {
                event: AstronomicalEvent::Equinox,
                month: 3,
                day: 20,
            },
            description: "Day and night in balance; light ascending.",
        },
        SeasonalMarker {
            id: "beltane",
            name: "Beltane",
            timing: MarkerTiming::FixedDate { month: 5, day: 1 },
            description: "Cross-quarter day between spring equinox and summer solstice.",
        },
        SeasonalMarker {
            id: "summer-solstice",
            name: "Summer Solstice",
            timing: MarkerTiming::Astronomical {
                event: AstronomicalEvent::Solstice,
                month: 6,
                day: 21,
            },
            description: "Longest day of the year.",
        },
        SeasonalMarker {
            id: "lughnasadh",
            name: "Lughnasadh",
            timing: MarkerTiming::FixedDate { month: 8, day: 1 },
            description: "Cross-quarter day between summer solstice and autumn equinox.",
        },
        SeasonalMarker {
            id: "autumn-equinox",
            name: "Autumn Equinox",
            timing: MarkerTiming::Astronomical {
                event: AstronomicalEvent::Equinox,
                month: 9,
                day: 22,
            },
            description: "Day and night in balance; light descending.",
        },
        SeasonalMarker {
            id: "samhain",
            name: "Samhain",
            timing: MarkerTiming::FixedDate { month: 11, day: 1 },
            description: "Cross-quarter day between autumn equinox and winter solstice.",
        },
    ];
}

/// Composite seasonal context for one calendar day. Derived, never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalContext {
    pub season: Season,
    pub lunar_phase: LunarPhase,
    pub solar_term: Option<String>,
}

fn marker_anchor_date(year: i32, month: u32, day: u32) -> NaiveDate {
    // All anchors are fixed month/day pairs that exist in every year.
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, date_math::days_in_month(year, month)).unwrap())
}

/// Marker whose anchor falls within ±1 day of `date`, if any. Year
/// wraparound is handled by also checking the adjacent years' anchors.
pub fn marker_near(date: NaiveDate) -> Option<&'static SeasonalMarker> {
    SEASONAL_MARKERS.iter().find(|marker| {
        let (month, day) = marker.timing.anchor();
        [date.year() - 1, date.year(), date.year() + 1]
            .iter()
            .any(|&year| {
                let anchor = marker_anchor_date(year, month, day);
                (date - anchor).num_days().abs() <= MARKER_WINDOW_DAYS
            })
    })
}

/// Next upcoming marker on or after `date`, with days until it.
pub fn next_marker(date: NaiveDate) -> (&'static SeasonalMarker, i64) {
    let mut best: Option<(&'static SeasonalMarker, i64)> = None;
    for marker in SEASONAL_MARKERS.iter() {
        let (month, day) = marker.timing.anchor();
        for year in [date.year(), date.year() + 1] {
            let anchor = marker_anchor_date(year, month, day);
            let days = (anchor - date).num_days();
            if days >= 0 && best.map_or(true, |(_, b)| days < b) {
                best = Some((marker, days));
            }
        }
    }
    // Every date has a marker within the next year.
    best.unwrap()
}

/// Season, nearest solar term, and lunar phase for one date.
pub fn seasonal_context(date: NaiveDate) -> SeasonalContext {
    SeasonalContext {
        season: Season::from_month(date.month()),
        lunar_phase: lunar::lunar_phase(date),
        solar_term: marker_near(date).map(|m| m.name.to_string()),
    }
}
