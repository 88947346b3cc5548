pub mod cache;

// Re-export for convenience
pub use cache::{CacheStats, RewardPointsCache};
