//! Batch conversion with per-call memoization and an optional bounded
//! cross-call cache.
//!
//! A month grid asks for 42 cells and a year view for 13×28; the same
//! dates recur across re-renders. Each distinct calendar day is computed
//! once per call, and a [`BatchConverter`] keeps an LRU memo so repeated
//! grids skip the engine entirely. Output order always mirrors input
//! order, duplicates included.

use std::collections::HashMap;
use std::num::NonZeroUsize;

use chrono::NaiveDate;
use lru::LruCache;
use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::debug;

use crate::calendar::{self, Natural13Date};
use crate::lunar::{self, LunarPhase};

/// Distinct-date count above which misses are computed on the rayon
/// pool. Small grids are cheaper inline.
const PARALLEL_THRESHOLD: usize = 128;

/// Memoization core: `compute` runs exactly once per distinct date, and
/// the result vector lines up 1:1 with `dates`.
fn batch_map<T, F>(dates: &[NaiveDate], compute: F) -> Vec<T>
where
    T: Clone + Send,
    F: Fn(NaiveDate) -> T + Sync,
{
    let mut index: HashMap<NaiveDate, usize> = HashMap::with_capacity(dates.len());
    let mut unique: Vec<NaiveDate> = Vec::new();
    for &date in dates {
        index.entry(date).or_insert_with(|| {
            unique.push(date);
            unique.len() - 1
        });
    }

    let computed: Vec<T> = if unique.len() >= PARALLEL_THRESHOLD {
        unique.par_iter().map(|&d| compute(d)).collect()
    } else {
        unique.iter().map(|&d| compute(d)).collect()
    };

    dates.iter().map(|d| computed[index[d]].clone()).collect()
}

/// One-shot batch conversion, memoized for the duration of the call.
pub fn batch_convert(dates: &[NaiveDate]) -> Vec<Natural13Date> {
    batch_map(dates, calendar::to_natural13)
}

/// One-shot batch lunar phases, memoized for the duration of the call.
pub fn batch_lunar_phases(dates: &[NaiveDate]) -> Vec<LunarPhase> {
    batch_map(dates, lunar::lunar_phase)
}

/// Batch front with a bounded cross-call memo. Safe to share across
/// threads; both caches sit behind `parking_lot` mutexes.
pub struct BatchConverter {
    conversions: Mutex<LruCache<NaiveDate, Natural13Date>>,
    phases: Mutex<LruCache<NaiveDate, LunarPhase>>,
}

impl BatchConverter {
    /// `capacity` bounds each memo independently; eviction is LRU, so a
    /// long-running process cannot grow the cache without limit.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            conversions: Mutex::new(LruCache::new(capacity)),
            phases: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn batch_convert(&self, dates: &[NaiveDate]) -> Vec<Natural13Date> {
        Self::cached_batch(&self.conversions, dates, calendar::to_natural13)
    }

    pub fn batch_lunar_phases(&self, dates: &[NaiveDate]) -> Vec<LunarPhase> {
        Self::cached_batch(&self.phases, dates, lunar::lunar_phase)
    }

    /// Drop all memoized entries.
    pub fn clear(&self) {
        self.conversions.lock().clear();
        self.phases.lock().clear();
    }

    fn cached_batch<T, F>(
        cache: &Mutex<LruCache<NaiveDate, T>>,
        dates: &[NaiveDate],
        compute: F,
    ) -> Vec<T>
    where
        T: Clone + Send,
        F: Fn(NaiveDate) -> T + Sync,
    {
        // Results are collected call-locally so the answer never depends
        // on LRU retention; the cache is only an accelerator.
        let mut results: HashMap<NaiveDate, T> = HashMap::with_capacity(dates.len());
        let mut misses: Vec<NaiveDate> = Vec::new();
        {
            let mut guard = cache.lock();
            for &date in dates {
                if results.contains_key(&date) {
                    continue;
                }
                if let Some(value) = guard.get(&date) {
                    results.insert(date, value.clone());
                } else if !misses.contains(&date) {
                    misses.push(date);
                }
            }
        }

        if !misses.is_empty() {
            debug!(total = dates.len(), misses = misses.len(), "batch cache fill");
            let computed: Vec<T> = if misses.len() >= PARALLEL_THRESHOLD {
                misses.par_iter().map(|&d| compute(d)).collect()
            } else {
                misses.iter().map(|&d| compute(d)).collect()
            };
            let mut guard = cache.lock();
            for (date, value) in misses.into_iter().zip(computed) {
                guard.put(date, value.clone());
                results.insert(date, value);
            }
        }

        dates.iter().map(|d| results[d].clone()).collect()
    }
}

impl Default for BatchConverter {
    fn default() -> Self {
        // Two years of daily cells.
        Self::new(NonZeroUsize::new(732).unwrap())
    }
}
