use crate::application::rewards::RewardEngine;
use crate::domain::error::RewardError;
use crate::domain::model::{NearbyAttraction, NearbyAttractionsReport, User};

/// The `limit` attractions closest to the user's latest visit, with the
/// points each would earn.
///
/// Returns `None` for a user with no visits.
pub async fn nearby_attractions(
    engine: &RewardEngine,
    user: &User,
    limit: usize,
) -> Result<Option<NearbyAttractionsReport>, RewardError> {
    let Some(last) = user.last_visited_location() else {
        return Ok(None);
    };

    let mut attractions = Vec::with_capacity(limit);
    for (attraction, distance_miles) in engine.index().nearest(&last.location, limit) {
        let reward_points = engine.get_reward_points(attraction, user).await?;
        attractions.push(NearbyAttraction {
            attraction_name: attraction.attraction_name.clone(),
            attraction_latitude: attraction.location.latitude,
            attraction_longitude: attraction.location.longitude,
            distance_miles,
            reward_points,
        });
    }

    Ok(Some(NearbyAttractionsReport {
        user_name: user.user_name().to_string(),
        user_latitude: last.location.latitude,
        user_longitude: last.location.longitude,
        attractions,
    }))
}
