//! Bidirectional conversion between the Gregorian calendar and the
//! Natural13 calendar — a fixed 13-month year of twelve 28-day months
//! plus a 29/30-day closing month, anchored to December 21 — together
//! with lunar phase, seasonal markers, batch conversion, and event
//! overlay mapping.
//!
//! All conversion and astronomical functions are pure and thread-safe;
//! the only stateful pieces are the bounded [`batch::BatchConverter`]
//! memo and the async [`overlay::OverlayStore`] boundary.
//!
//! ```
//! use chrono::NaiveDate;
//!
//! let solstice = NaiveDate::from_ymd_opt(2025, 12, 21).unwrap();
//! let n13 = natural13::to_natural13(solstice);
//! assert_eq!((n13.month, n13.day), (1, 1));
//! assert_eq!(n13.month_name, "Wolf Moon");
//!
//! let phase = natural13::lunar_phase(solstice);
//! assert!(phase.illumination <= 100.0);
//! ```

pub mod batch;
pub mod calendar;
pub mod date_math;
pub mod error;
pub mod lunar;
pub mod overlay;
pub mod seasonal;

pub use batch::{batch_convert, batch_lunar_phases, BatchConverter};
pub use calendar::{to_gregorian, to_natural13, to_natural13_ymd, Natural13Date};
pub use error::{CalendarError, StoreError};
pub use lunar::{lunar_phase, LunarPhase, Phase, SYNODIC_MONTH};
pub use overlay::{
    CalendarOverlay, CalendarSystem, MemoryOverlayStore, OverlayMapper, OverlayStore,
    SystemRegistry,
};
pub use seasonal::{seasonal_context, Season, SeasonalContext, SeasonalMarker};
