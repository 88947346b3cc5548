use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

pub type AttractionId = Uuid;
pub type UserId = Uuid;

// 经纬度坐标 (degrees)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

// 景点 (catalog entry, immutable once loaded)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub attraction_id: AttractionId,
    pub attraction_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    pub location: Location,
}

impl Attraction {
    pub fn new(
        name: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            attraction_id: Uuid::new_v4(),
            attraction_name: name.into(),
            city: city.into(),
            state: state.into(),
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitedLocation {
    pub user_id: UserId,
    pub location: Location,
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    pub fn new(user_id: UserId, location: Location, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserReward {
    pub visited_location: VisitedLocation,
    pub attraction: Attraction,
    pub reward_points: i32,
}

/// A traveller as seen by the reward engine.
///
/// The engine only reads the visited locations and appends rewards. Both lists
/// sit behind locks so other code paths may append while a calculation runs.
#[derive(Debug)]
pub struct User {
    user_id: UserId,
    user_name: String,
    visited_locations: RwLock<Vec<VisitedLocation>>,
    user_rewards: RwLock<Vec<UserReward>>,
}

impl User {
    pub fn new(user_id: UserId, user_name: impl Into<String>) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            visited_locations: RwLock::new(Vec::new()),
            user_rewards: RwLock::new(Vec::new()),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn add_visited_location(&self, visited: VisitedLocation) {
        self.visited_locations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(visited);
    }

    pub fn visited_locations(&self) -> Vec<VisitedLocation> {
        self.visited_locations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent visit by timestamp
    pub fn last_visited_location(&self) -> Option<VisitedLocation> {
        self.visited_locations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .max_by_key(|v| v.time_visited)
            .cloned()
    }

    /// Appends a reward unless one for the same attraction is already held.
    ///
    /// Returns `false` when the reward was a duplicate and nothing changed.
    pub fn add_user_reward(&self, reward: UserReward) -> bool {
        let mut rewards = self
            .user_rewards
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let id = reward.attraction.attraction_id;
        if rewards.iter().any(|r| r.attraction.attraction_id == id) {
            return false;
        }
        rewards.push(reward);
        true
    }

    pub fn user_rewards(&self) -> Vec<UserReward> {
        self.user_rewards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn rewarded_attraction_ids(&self) -> HashSet<AttractionId> {
        self.user_rewards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| r.attraction.attraction_id)
            .collect()
    }

    pub fn total_reward_points(&self) -> i64 {
        self.user_rewards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|r| i64::from(r.reward_points))
            .sum()
    }
}

// 用户输入文件格式 (users JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default = "Uuid::new_v4")]
    pub user_id: UserId,
    pub user_name: String,
    #[serde(default)]
    pub visited_locations: Vec<VisitRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisitRecord {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "Utc::now")]
    pub time_visited: DateTime<Utc>,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        let user = User::new(record.user_id, record.user_name);
        for visit in record.visited_locations {
            user.add_visited_location(VisitedLocation::new(
                record.user_id,
                Location::new(visit.latitude, visit.longitude),
                visit.time_visited,
            ));
        }
        user
    }
}

// 附近景点查询结果
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAttraction {
    pub attraction_name: String,
    pub attraction_latitude: f64,
    pub attraction_longitude: f64,
    pub distance_miles: f64,
    pub reward_points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyAttractionsReport {
    pub user_name: String,
    pub user_latitude: f64,
    pub user_longitude: f64,
    pub attractions: Vec<NearbyAttraction>,
}
