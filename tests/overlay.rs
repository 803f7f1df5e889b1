//! Overlay mapping policy against the in-memory store.

use async_trait::async_trait;
use chrono::NaiveDate;
use natural13::overlay::{
    CalendarOverlay, CalendarSystem, ConvertedDate, MemoryOverlayStore, OverlayFilter, OverlayKey,
    OverlayMapper, OverlayStore, SystemRegistry,
};
use natural13::{CalendarError, StoreError};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn mapper() -> OverlayMapper<MemoryOverlayStore> {
    OverlayMapper::new(SystemRegistry::builtin(), MemoryOverlayStore::new())
}

#[tokio::test]
async fn maps_an_event_into_natural13() {
    let mapper = mapper();
    let overlay = mapper
        .map_event("e1", ymd(2025, 12, 21), "natural13")
        .await
        .unwrap();

    assert_eq!(overlay.id, "e1:natural13");
    assert_eq!(overlay.converted_date.month, 1);
    assert_eq!(overlay.converted_date.day, 1);
    assert_eq!(overlay.converted_date.month_name, "Wolf Moon");
    assert_eq!(overlay.solar_term.as_deref(), Some("Winter Solstice"));
    assert!(overlay.lunar_phase.is_some());
    assert_eq!(overlay.created_at, overlay.updated_at);
}

#[tokio::test]
async fn remapping_replaces_instead_of_duplicating() {
    let mapper = mapper();
    let first = mapper
        .map_event("e1", ymd(2025, 3, 1), "natural13")
        .await
        .unwrap();
    let second = mapper
        .map_event("e1", ymd(2025, 3, 15), "natural13")
        .await
        .unwrap();

    let all = mapper.overlays_for_event("e1").await.unwrap();
    assert_eq!(all.len(), 1, "one overlay per (event, system) pair");
    assert_eq!(all[0].converted_date, second.converted_date);
    assert_eq!(
        all[0].converted_date,
        ConvertedDate::from(natural13::to_natural13(ymd(2025, 3, 15)))
    );
    // Replacement keeps the original creation timestamp.
    assert_eq!(all[0].created_at, first.created_at);
    assert!(all[0].updated_at >= first.updated_at);
}

#[tokio::test]
async fn different_systems_are_independent() {
    let mapper = mapper();
    mapper
        .map_event("e1", ymd(2025, 6, 21), "natural13")
        .await
        .unwrap();
    let gregorian = mapper
        .map_event("e1", ymd(2025, 6, 21), "gregorian")
        .await
        .unwrap();

    assert_eq!(gregorian.converted_date.month_name, "June");
    assert_eq!(mapper.overlays_for_event("e1").await.unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_system_is_rejected_before_any_write() {
    let store = MemoryOverlayStore::new();
    let mapper = OverlayMapper::new(SystemRegistry::builtin(), store);
    let err = mapper
        .map_event("e1", ymd(2025, 1, 1), "julian")
        .await
        .unwrap_err();
    assert!(matches!(err, CalendarError::UnknownCalendarSystem(id) if id == "julian"));
    assert!(mapper.overlays_for_event("e1").await.unwrap().is_empty());
}

#[tokio::test]
async fn removal_is_a_hard_delete() {
    let mapper = mapper();
    mapper
        .map_event("e1", ymd(2025, 5, 5), "natural13")
        .await
        .unwrap();
    mapper.remove_overlay("e1", "natural13").await.unwrap();
    assert!(mapper.overlay_for("e1", "natural13").await.unwrap().is_none());

    let err = mapper.remove_overlay("e1", "natural13").await.unwrap_err();
    assert!(matches!(err, CalendarError::NotFound { .. }));
}

#[tokio::test]
async fn custom_registry_validates_ids() {
    let registry = SystemRegistry::new(vec![CalendarSystem::natural13()]);
    let mapper = OverlayMapper::new(registry, MemoryOverlayStore::new());
    assert!(mapper
        .map_event("e1", ymd(2025, 1, 1), "gregorian")
        .await
        .is_err());
    assert!(mapper
        .map_event("e1", ymd(2025, 1, 1), "natural13")
        .await
        .is_ok());
}

#[tokio::test]
async fn persisted_document_shape() {
    let mapper = mapper();
    let overlay = mapper
        .map_event("launch", ymd(2025, 12, 21), "natural13")
        .await
        .unwrap();

    let doc = serde_json::to_value(&overlay).unwrap();
    assert_eq!(doc["id"], "launch:natural13");
    assert_eq!(doc["eventId"], "launch");
    assert_eq!(doc["calendarSystemId"], "natural13");
    assert_eq!(doc["convertedDate"]["year"], 2026);
    assert_eq!(doc["convertedDate"]["month"], 1);
    assert_eq!(doc["convertedDate"]["monthName"], "Wolf Moon");
    assert_eq!(doc["solarTerm"], "Winter Solstice");
    assert!(doc["lunarPhase"]["age"].is_number());
    assert!(doc.get("createdAt").is_some());

    let back: CalendarOverlay = serde_json::from_value(doc).unwrap();
    assert_eq!(back, overlay);
}

/// Store that fails every write, to prove failures pass through
/// untouched and unretried.
struct FailingStore;

#[async_trait]
impl OverlayStore for FailingStore {
    async fn upsert(&self, _: &OverlayKey, _: CalendarOverlay) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("write path down".into()))
    }

    async fn get(&self, _: &OverlayKey) -> Result<Option<CalendarOverlay>, StoreError> {
        Ok(None)
    }

    async fn delete(&self, _: &OverlayKey) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("write path down".into()))
    }

    async fn query(&self, _: &OverlayFilter) -> Result<Vec<CalendarOverlay>, StoreError> {
        Ok(Vec::new())
    }
}

#[tokio::test]
async fn store_failures_surface_unchanged() {
    let mapper = OverlayMapper::new(SystemRegistry::builtin(), FailingStore);
    let err = mapper
        .map_event("e1", ymd(2025, 2, 2), "natural13")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CalendarError::Store(StoreError::Unavailable(_))
    ));
}
