// Reward points cache using DashMap
use crate::domain::error::RewardError;
use crate::domain::model::{AttractionId, UserId};
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe memo of reward points per (attraction, user)
///
/// Entries are never evicted; a pair's value is fixed once written.
///
/// Two callers missing on the same key at the same time will both run
/// `compute`. The first value written wins and both callers get it, so the
/// race costs a duplicate provider call but never exposes two values.
pub struct RewardPointsCache {
    map: DashMap<(AttractionId, UserId), i32>,
    hits: AtomicU64,
    misses: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl RewardPointsCache {
    pub fn new() -> Self {
        Self {
            map: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, attraction_id: AttractionId, user_id: UserId) -> Option<i32> {
        self.map.get(&(attraction_id, user_id)).map(|entry| *entry.value())
    }

    /// Cached value for the pair, or the result of `compute` stored first-write-wins.
    ///
    /// A failed `compute` leaves the cache untouched.
    pub async fn get_or_compute<F, Fut>(
        &self,
        attraction_id: AttractionId,
        user_id: UserId,
        compute: F,
    ) -> Result<i32, RewardError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<i32, RewardError>>,
    {
        if let Some(points) = self.get(attraction_id, user_id) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(points);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = compute().await?;
        let stored = *self
            .map
            .entry((attraction_id, user_id))
            .or_insert(computed)
            .value();
        Ok(stored)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.map.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for RewardPointsCache {
    fn default() -> Self {
        Self::new()
    }
}
