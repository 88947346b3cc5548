use crate::domain::error::RewardError;
use crate::domain::model::{AttractionId, UserId};
use crate::domain::traits::RewardPointsProvider;
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

pub const MIN_POINTS: i32 = 1;
pub const MAX_POINTS: i32 = 1000;

/// Stand-in for the remote scoring service
///
/// Points are derived from sha256(attraction_id + user_id), so the same pair
/// always scores the same. `latency` simulates the remote round trip.
pub struct DigestPointsProvider {
    latency: Duration,
}

impl DigestPointsProvider {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for DigestPointsProvider {
    fn default() -> Self {
        Self::new(Duration::ZERO)
    }
}

pub fn digest_points(attraction_id: AttractionId, user_id: UserId) -> i32 {
    let mut hasher = Sha256::new();
    hasher.update(attraction_id.as_bytes());
    hasher.update(user_id.as_bytes());
    let digest = hasher.finalize();

    let mut head = [0u8; 4];
    head.copy_from_slice(&digest[..4]);
    let span = (MAX_POINTS - MIN_POINTS + 1) as u32;
    MIN_POINTS + (u32::from_be_bytes(head) % span) as i32
}

#[async_trait]
impl RewardPointsProvider for DigestPointsProvider {
    async fn points_for(
        &self,
        attraction_id: AttractionId,
        user_id: UserId,
    ) -> Result<i32, RewardError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(digest_points(attraction_id, user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn points_are_stable_and_in_range() {
        for _ in 0..200 {
            let (a, u) = (Uuid::new_v4(), Uuid::new_v4());
            let points = digest_points(a, u);
            assert!((MIN_POINTS..=MAX_POINTS).contains(&points));
            assert_eq!(points, digest_points(a, u));
        }
    }

    #[tokio::test]
    async fn provider_matches_digest() {
        let (a, u) = (Uuid::new_v4(), Uuid::new_v4());
        let provider = DigestPointsProvider::default();
        assert_eq!(provider.points_for(a, u).await.unwrap(), digest_points(a, u));
    }
}
