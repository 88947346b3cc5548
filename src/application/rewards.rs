//! Reward calculation.
//!
//! One `calculate_rewards` call runs in four steps:
//!
//! 1. snapshot the user's visits and already-rewarded attraction ids
//! 2. fan out one spatial query per visit, collecting the first visit seen
//!    for every attraction in range (join)
//! 3. fan out one cached points lookup per candidate (join)
//! 4. append the rewards to the user, on the calling task
//!
//! Both fan-outs share one worker pool, a semaphore sized at construction.
//! Every call holds a read guard on the engine's gate for its whole run, so
//! `shutdown` can wait for accepted calls to finish before closing the pool.
//! Which visit gets credited when several are in range of the same
//! attraction depends on task scheduling; the set of rewarded attractions
//! does not.

use crate::domain::error::RewardError;
use crate::domain::geo::distance;
use crate::domain::model::{
    Attraction, AttractionId, Location, User, UserId, UserReward, VisitedLocation,
};
use crate::domain::traits::{LocationProvider, RewardPointsProvider};
use crate::infrastructure::config::{validate_buffer, EngineSettings};
use crate::infrastructure::spatial::SpatialIndex;
use crate::infrastructure::storage::cache::{CacheStats, RewardPointsCache};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Proximity buffer that admits every attraction
pub const MAX_PROXIMITY_BUFFER: f64 = f64::INFINITY;

type Candidate = (AttractionId, VisitedLocation);
type Scored = (AttractionId, VisitedLocation, i32);

pub struct RewardEngine {
    index: Arc<SpatialIndex>,
    cache: Arc<RewardPointsCache>,
    points: Arc<dyn RewardPointsProvider>,
    pool: Arc<Semaphore>,
    workers: usize,
    gate: RwLock<()>,
    closing: AtomicBool,
    default_buffer: f64,
    // f64 bits
    proximity_buffer: AtomicU64,
    attraction_proximity_range: f64,
    deadline: Option<Duration>,
}

impl RewardEngine {
    /// Loads the catalog once and builds the index, cache and worker pool.
    pub async fn new(
        locations: &dyn LocationProvider,
        points: Arc<dyn RewardPointsProvider>,
        settings: &EngineSettings,
    ) -> Result<Self, RewardError> {
        settings.validate()?;

        let attractions = locations.list_attractions().await?;
        let index = SpatialIndex::build(attractions, settings.cell_size_degrees)?
            .with_distance_cache(settings.distance_cache);
        let workers = settings.worker_count();

        info!(
            attractions = index.len(),
            cells = index.cell_count(),
            workers,
            proximity_buffer = settings.proximity_buffer_miles,
            "reward engine ready"
        );

        Ok(Self {
            index: Arc::new(index),
            cache: Arc::new(RewardPointsCache::new()),
            points,
            pool: Arc::new(Semaphore::new(workers)),
            workers,
            gate: RwLock::new(()),
            closing: AtomicBool::new(false),
            default_buffer: settings.proximity_buffer_miles,
            proximity_buffer: AtomicU64::new(settings.proximity_buffer_miles.to_bits()),
            attraction_proximity_range: settings.attraction_proximity_range_miles,
            deadline: settings.deadline(),
        })
    }

    pub fn proximity_buffer(&self) -> f64 {
        f64::from_bits(self.proximity_buffer.load(Ordering::Acquire))
    }

    /// Sets the reward radius in miles. Negative or NaN values are rejected.
    pub fn set_proximity_buffer(&self, miles: f64) -> Result<(), RewardError> {
        validate_buffer(miles)?;
        self.proximity_buffer.store(miles.to_bits(), Ordering::Release);
        debug!(miles, "proximity buffer set");
        Ok(())
    }

    pub fn reset_proximity_buffer(&self) {
        self.proximity_buffer
            .store(self.default_buffer.to_bits(), Ordering::Release);
    }

    pub fn set_proximity_buffer_to_max(&self) {
        self.proximity_buffer
            .store(MAX_PROXIMITY_BUFFER.to_bits(), Ordering::Release);
    }

    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn attractions(&self) -> &[Attraction] {
        self.index.attractions()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: &Location,
    ) -> bool {
        distance(&attraction.location, location) <= self.attraction_proximity_range
    }

    pub fn is_near_attraction(&self, visited: &VisitedLocation, attraction: &Attraction) -> bool {
        distance(&attraction.location, &visited.location) <= self.proximity_buffer()
    }

    /// Points for one pair, through the same cache the bulk flow uses
    pub async fn get_reward_points(
        &self,
        attraction: &Attraction,
        user: &User,
    ) -> Result<i32, RewardError> {
        let (attraction_id, user_id) = (attraction.attraction_id, user.user_id());
        self.cache
            .get_or_compute(attraction_id, user_id, || {
                fetch_points(self.points.as_ref(), attraction_id, user_id)
            })
            .await
    }

    /// Grants every newly qualifying attraction to `user` and returns the new rewards.
    ///
    /// Nothing is appended unless both phases succeed.
    pub async fn calculate_rewards(&self, user: &User) -> Result<Vec<UserReward>, RewardError> {
        let _in_flight = self.gate.read().await;
        if self.closing.load(Ordering::Acquire) {
            return Err(RewardError::ShutDown);
        }

        let visited = user.visited_locations();
        if visited.is_empty() {
            return Ok(Vec::new());
        }
        let rewarded = Arc::new(user.rewarded_attraction_ids());
        let radius = self.proximity_buffer();
        let user_id = user.user_id();

        let phases = async {
            let candidates = self.search_candidates(visited, rewarded, radius).await?;
            self.score_candidates(candidates, user_id).await
        };
        let scored = match self.deadline {
            Some(limit) => tokio::time::timeout(limit, phases).await.map_err(|_| {
                warn!(%user_id, ?limit, "reward calculation timed out");
                RewardError::DeadlineExceeded(limit)
            })??,
            None => phases.await?,
        };

        let rewards = into_rewards(&self.index, scored)?;
        let mut granted = Vec::with_capacity(rewards.len());
        for reward in rewards {
            if user.add_user_reward(reward.clone()) {
                granted.push(reward);
            }
        }

        debug!(%user_id, granted = granted.len(), radius, "rewards committed");
        Ok(granted)
    }

    /// Stops accepting calculations, waits for the accepted ones to commit,
    /// then closes the pool. Later calculations fail with
    /// [`RewardError::ShutDown`].
    pub async fn shutdown(&self) {
        self.closing.store(true, Ordering::Release);
        let _drained = self.gate.write().await;
        if self.pool.is_closed() {
            return;
        }
        self.pool.close();
        info!(cached_points = self.cache.len(), "reward engine shut down");
    }

    async fn search_candidates(
        &self,
        visited: Vec<VisitedLocation>,
        rewarded: Arc<HashSet<AttractionId>>,
        radius: f64,
    ) -> Result<Vec<Candidate>, RewardError> {
        let found: Arc<DashMap<AttractionId, VisitedLocation>> = Arc::new(DashMap::new());
        let mut tasks = JoinSet::new();

        for visit in visited {
            let permit = Arc::clone(&self.pool).acquire_owned().await?;
            let index = Arc::clone(&self.index);
            let rewarded = Arc::clone(&rewarded);
            let found = Arc::clone(&found);
            tasks.spawn(async move {
                let _permit = permit;
                for attraction in index.nearby(&visit.location, radius) {
                    if rewarded.contains(&attraction.attraction_id) {
                        continue;
                    }
                    found
                        .entry(attraction.attraction_id)
                        .or_insert_with(|| visit.clone());
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            joined?;
        }

        let mut candidates: Vec<Candidate> = found
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect();
        candidates.sort_by_key(|(id, _)| *id);

        debug!(candidates = candidates.len(), radius, "candidate search joined");
        Ok(candidates)
    }

    async fn score_candidates(
        &self,
        candidates: Vec<Candidate>,
        user_id: UserId,
    ) -> Result<Vec<Scored>, RewardError> {
        let mut tasks = JoinSet::new();

        for (attraction_id, visit) in candidates {
            let permit = Arc::clone(&self.pool).acquire_owned().await?;
            let cache = Arc::clone(&self.cache);
            let points = Arc::clone(&self.points);
            tasks.spawn(async move {
                let _permit = permit;
                let earned = cache
                    .get_or_compute(attraction_id, user_id, || {
                        fetch_points(points.as_ref(), attraction_id, user_id)
                    })
                    .await?;
                Ok::<_, RewardError>((attraction_id, visit, earned))
            });
        }

        let mut scored = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            scored.push(joined??);
        }
        scored.sort_by_key(|(id, _, _)| *id);

        debug!(scored = scored.len(), %user_id, "reward scoring joined");
        Ok(scored)
    }
}

/// Resolves scored candidates against the catalog. Every candidate came
/// out of `index`, so a missing id means the index changed under us.
fn into_rewards(
    index: &SpatialIndex,
    scored: Vec<Scored>,
) -> Result<Vec<UserReward>, RewardError> {
    scored
        .into_iter()
        .map(|(attraction_id, visited_location, reward_points)| {
            let attraction = index.attraction(&attraction_id).ok_or_else(|| {
                RewardError::TaskFailed(format!("attraction {attraction_id} is not in the catalog"))
            })?;
            Ok(UserReward {
                visited_location,
                attraction: attraction.clone(),
                reward_points,
            })
        })
        .collect()
}

async fn fetch_points(
    provider: &dyn RewardPointsProvider,
    attraction_id: AttractionId,
    user_id: UserId,
) -> Result<i32, RewardError> {
    provider
        .points_for(attraction_id, user_id)
        .await
        .map_err(|e| {
            warn!(%attraction_id, %user_id, error = %e, "reward points provider failed");
            e
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn catalog() -> SpatialIndex {
        SpatialIndex::build(
            vec![Attraction::new("Disneyland", "Anaheim", "CA", Location::new(33.8, -117.9))],
            0.01,
        )
        .unwrap()
    }

    fn visit() -> VisitedLocation {
        VisitedLocation::new(Uuid::new_v4(), Location::new(33.8, -117.9), Utc::now())
    }

    #[test]
    fn resolves_scored_candidates() {
        let index = catalog();
        let id = index.attractions()[0].attraction_id;

        let rewards = into_rewards(&index, vec![(id, visit(), 250)]).unwrap();
        assert_eq!(rewards.len(), 1);
        assert_eq!(rewards[0].attraction.attraction_name, "Disneyland");
        assert_eq!(rewards[0].reward_points, 250);
    }

    #[test]
    fn unknown_candidate_fails_instead_of_vanishing() {
        let index = catalog();
        let known = index.attractions()[0].attraction_id;

        let scored = vec![(known, visit(), 1), (Uuid::new_v4(), visit(), 2)];
        let err = into_rewards(&index, scored).unwrap_err();
        assert!(matches!(err, RewardError::TaskFailed(_)));
    }
}
