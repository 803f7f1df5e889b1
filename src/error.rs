//! Error taxonomy for conversion, mapping, and the overlay store boundary.

use thiserror::Error;

/// Errors surfaced by the overlay store collaborator. The core never
/// retries these; they pass through [`CalendarError::Store`] unchanged.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("overlay store unavailable: {0}")]
    Unavailable(String),
    #[error("overlay store rejected write: {0}")]
    WriteRejected(String),
    #[error("overlay store backend error: {0}")]
    Backend(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, Error)]
pub enum CalendarError {
    /// Malformed or out-of-range Gregorian input.
    #[error("invalid Gregorian date {year:04}-{month:02}-{day:02}")]
    InvalidGregorianDate { year: i32, month: u32, day: u32 },

    /// Month/day outside the valid bounds for a Natural13 date.
    #[error("invalid Natural13 date: month {month}, day {day} (valid day range for this month is 1..={max_day})")]
    InvalidNatural13Date { month: u32, day: u32, max_day: u32 },

    /// Overlay mapping referenced a calendar system not present in the
    /// registry supplied by the caller.
    #[error("unknown calendar system \"{0}\"")]
    UnknownCalendarSystem(String),

    /// Removal of an overlay that does not exist.
    #[error("no overlay found for event \"{event_id}\" in system \"{system_id}\"")]
    NotFound { event_id: String, system_id: String },

    /// Store-layer failure, surfaced unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),
}
