//! Event overlays: one event mapped into one target calendar system,
//! with a lunar and solar-term snapshot taken at mapping time.
//!
//! The mapper owns the mapping and conflict policy (one overlay per
//! event/system pair, replace on remap, hard delete on removal); the
//! write itself goes through the [`OverlayStore`] collaborator.

mod store;

pub use store::{MemoryOverlayStore, OverlayFilter, OverlayKey, OverlayStore};

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalendarError;
use crate::lunar::LunarPhase;
use crate::calendar::{self, Natural13Date};
use crate::seasonal;

/// Registry id of the Natural13 system shipped with this crate.
pub const NATURAL13_SYSTEM_ID: &str = "natural13";

/// Registry id conventionally used for plain Gregorian overlays.
pub const GREGORIAN_SYSTEM_ID: &str = "gregorian";

/// One calendar system known to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSystem {
    pub id: String,
    pub display_name: String,
    pub month_names: Vec<String>,
}

impl CalendarSystem {
    /// The Natural13 system with the crate's month names.
    pub fn natural13() -> Self {
        Self {
            id: NATURAL13_SYSTEM_ID.to_string(),
            display_name: "Natural13".to_string(),
            month_names: calendar::MONTH_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn gregorian() -> Self {
        Self {
            id: GREGORIAN_SYSTEM_ID.to_string(),
            display_name: "Gregorian".to_string(),
            month_names: [
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Caller-supplied list of registered calendar systems, used to validate
/// overlay targets and label converted dates.
#[derive(Debug, Clone, Default)]
pub struct SystemRegistry {
    systems: HashMap<String, CalendarSystem>,
}

impl SystemRegistry {
    pub fn new(systems: Vec<CalendarSystem>) -> Self {
        Self {
            systems: systems.into_iter().map(|s| (s.id.clone(), s)).collect(),
        }
    }

    /// Registry containing the two systems this crate converts between.
    pub fn builtin() -> Self {
        Self::new(vec![CalendarSystem::natural13(), CalendarSystem::gregorian()])
    }

    pub fn get(&self, id: &str) -> Option<&CalendarSystem> {
        self.systems.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.systems.contains_key(id)
    }
}

/// Converted date embedded in a persisted overlay document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertedDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub month_name: String,
}

impl From<Natural13Date> for ConvertedDate {
    fn from(d: Natural13Date) -> Self {
        Self {
            year: d.year,
            month: d.month,
            day: d.day,
            month_name: d.month_name.to_string(),
        }
    }
}

/// Persisted overlay document. The serialized field names are the store
/// contract; changing them breaks existing documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOverlay {
    pub id: String,
    pub event_id: String,
    pub calendar_system_id: String,
    pub converted_date: ConvertedDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lunar_phase: Option<LunarPhase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_term: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Maps events into calendar systems and keeps the one-overlay-per-pair
/// invariant through the store collaborator.
pub struct OverlayMapper<S: OverlayStore> {
    registry: SystemRegistry,
    store: S,
}

impl<S: OverlayStore> OverlayMapper<S> {
    pub fn new(registry: SystemRegistry, store: S) -> Self {
        Self { registry, store }
    }

    pub fn registry(&self) -> &SystemRegistry {
        &self.registry
    }

    /// Converted representation of `date` in the target system. The
    /// Natural13 system goes through the conversion engine; any other
    /// registered system keeps the Gregorian date, labeled with that
    /// system's own month names.
    fn convert_for(&self, system: &CalendarSystem, date: NaiveDate) -> ConvertedDate {
        if system.id == NATURAL13_SYSTEM_ID {
            calendar::to_natural13(date).into()
        } else {
            let month = date.month();
            let month_name = system
                .month_names
                .get((month - 1) as usize)
                .cloned()
                .unwrap_or_default();
            ConvertedDate {
                year: date.year(),
                month,
                day: date.day(),
                month_name,
            }
        }
    }

    /// Create or replace the overlay for `(event_id, system_id)`. The
    /// whole record is computed before the store is touched, so a failed
    /// or cancelled write commits nothing.
    pub async fn map_event(
        &self,
        event_id: &str,
        date: NaiveDate,
        system_id: &str,
    ) -> Result<CalendarOverlay, CalendarError> {
        let system = self
            .registry
            .get(system_id)
            .ok_or_else(|| CalendarError::UnknownCalendarSystem(system_id.to_string()))?;

        let context = seasonal::seasonal_context(date);
        let key = OverlayKey::new(event_id, system_id);
        let existing = self.store.get(&key).await?;
        let now = Utc::now();
        let overlay = CalendarOverlay {
            id: key.document_id(),
            event_id: event_id.to_string(),
            calendar_system_id: system_id.to_string(),
            converted_date: self.convert_for(system, date),
            lunar_phase: Some(context.lunar_phase),
            solar_term: context.solar_term,
            created_at: existing.map_or(now, |e| e.created_at),
            updated_at: now,
        };
        self.store.upsert(&key, overlay.clone()).await?;
        debug!(event = event_id, system = system_id, %date, "overlay upserted");
        Ok(overlay)
    }

    /// Hard-delete the overlay for `(event_id, system_id)`.
    pub async fn remove_overlay(
        &self,
        event_id: &str,
        system_id: &str,
    ) -> Result<(), CalendarError> {
        if !self.registry.contains(system_id) {
            return Err(CalendarError::UnknownCalendarSystem(system_id.to_string()));
        }
        let key = OverlayKey::new(event_id, system_id);
        if self.store.delete(&key).await? {
            debug!(event = event_id, system = system_id, "overlay removed");
            Ok(())
        } else {
            Err(CalendarError::NotFound {
                event_id: event_id.to_string(),
                system_id: system_id.to_string(),
            })
        }
    }

    /// Existing overlay for the pair, if one has been mapped.
    pub async fn overlay_for(
        &self,
        event_id: &str,
        system_id: &str,
    ) -> Result<Option<CalendarOverlay>, CalendarError> {
        let key = OverlayKey::new(event_id, system_id);
        Ok(self.store.get(&key).await?)
    }

    /// All overlays mapped for an event, across systems.
    pub async fn overlays_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<CalendarOverlay>, CalendarError> {
        Ok(self.store.query(&OverlayFilter::for_event(event_id)).await?)
    }
}
