//! Proximity rewards for travel attractions.
//!
//! [`RewardEngine`] grants a user a reward for every catalog attraction
//! within the proximity buffer of one of their visited locations. A uniform
//! grid ([`SpatialIndex`]) keeps each lookup local, and a memoizing cache
//! ([`RewardPointsCache`]) keeps the points provider to one call per
//! (attraction, user) pair.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use application::rewards::{RewardEngine, MAX_PROXIMITY_BUFFER};
pub use domain::error::RewardError;
pub use domain::geo::distance;
pub use domain::model::{Attraction, Location, User, UserReward, VisitedLocation};
pub use domain::traits::{LocationProvider, RewardPointsProvider};
pub use infrastructure::config::{Config, EngineSettings};
pub use infrastructure::spatial::SpatialIndex;
pub use infrastructure::storage::RewardPointsCache;
