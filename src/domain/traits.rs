use crate::domain::error::RewardError;
use crate::domain::model::{Attraction, AttractionId, UserId};
use async_trait::async_trait;

/// Source of the attraction catalog
///
/// Called once when the reward engine is built. A failure here fails
/// construction; there is no retry.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn list_attractions(&self) -> Result<Vec<Attraction>, RewardError>;
}

/// Scores a (attraction, user) pair
///
/// Implementations are expected to be deterministic for a given pair and may
/// be slow. The engine memoizes results, so a pair is normally scored once
/// per process.
#[async_trait]
pub trait RewardPointsProvider: Send + Sync {
    async fn points_for(
        &self,
        attraction_id: AttractionId,
        user_id: UserId,
    ) -> Result<i32, RewardError>;
}
