//! Overlay store collaborator boundary.
//!
//! The real store is an external document/key-value service; this module
//! defines the contract the mapper writes through, plus an in-memory
//! implementation for tests and local development. Store failures are
//! surfaced to callers unchanged and never retried here.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

use super::CalendarOverlay;

/// Key for one overlay: an (event, calendar system) pair. At most one
/// overlay exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OverlayKey {
    pub event_id: String,
    pub calendar_system_id: String,
}

impl OverlayKey {
    pub fn new(event_id: impl Into<String>, calendar_system_id: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            calendar_system_id: calendar_system_id.into(),
        }
    }

    /// Deterministic document id for this key.
    pub fn document_id(&self) -> String {
        format!("{}:{}", self.event_id, self.calendar_system_id)
    }
}

/// Query filter; `None` fields match everything.
#[derive(Debug, Clone, Default)]
pub struct OverlayFilter {
    pub event_id: Option<String>,
    pub calendar_system_id: Option<String>,
}

impl OverlayFilter {
    pub fn for_event(event_id: impl Into<String>) -> Self {
        Self {
            event_id: Some(event_id.into()),
            ..Self::default()
        }
    }

    fn matches(&self, overlay: &CalendarOverlay) -> bool {
        self.event_id
            .as_deref()
            .map_or(true, |e| overlay.event_id == e)
            && self
                .calendar_system_id
                .as_deref()
                .map_or(true, |s| overlay.calendar_system_id == s)
    }
}

/// Document store interface used by the mapper. Implementations must
/// apply writes for the same key in submission order (last writer wins).
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// Insert or replace the record for `key`.
    async fn upsert(&self, key: &OverlayKey, record: CalendarOverlay) -> Result<(), StoreError>;

    /// Fetch the record for `key`, if present.
    async fn get(&self, key: &OverlayKey) -> Result<Option<CalendarOverlay>, StoreError>;

    /// Hard-delete the record for `key`. Returns whether a record
    /// existed.
    async fn delete(&self, key: &OverlayKey) -> Result<bool, StoreError>;

    /// All records matching `filter`.
    async fn query(&self, filter: &OverlayFilter) -> Result<Vec<CalendarOverlay>, StoreError>;
}

/// In-memory store backed by a `HashMap` behind a `parking_lot` lock.
/// The lock is never held across an await point.
#[derive(Default)]
pub struct MemoryOverlayStore {
    records: RwLock<HashMap<OverlayKey, CalendarOverlay>>,
}

impl MemoryOverlayStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl OverlayStore for MemoryOverlayStore {
    async fn upsert(&self, key: &OverlayKey, record: CalendarOverlay) -> Result<(), StoreError> {
        self.records.write().insert(key.clone(), record);
        Ok(())
    }

    async fn get(&self, key: &OverlayKey) -> Result<Option<CalendarOverlay>, StoreError> {
        Ok(self.records.read().get(key).cloned())
    }

    async fn delete(&self, key: &OverlayKey) -> Result<bool, StoreError> {
        Ok(self.records.write().remove(key).is_some())
    }

    async fn query(&self, filter: &OverlayFilter) -> Result<Vec<CalendarOverlay>, StoreError> {
        let mut matches: Vec<CalendarOverlay> = self
            .records
            .read()
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(matches)
    }
}
