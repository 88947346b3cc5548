use crate::domain::model::{AttractionId, UserId};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RewardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Location provider error: {0}")]
    LocationProvider(String),

    #[error("Reward points provider failed for {attraction_id}/{user_id}: {reason}")]
    RewardProvider {
        attraction_id: AttractionId,
        user_id: UserId,
        reason: String,
    },

    #[error("Reward calculation exceeded deadline of {0:?}")]
    DeadlineExceeded(Duration),

    #[error("Reward engine has been shut down")]
    ShutDown,

    #[error("Worker task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl From<tokio::task::JoinError> for RewardError {
    fn from(err: tokio::task::JoinError) -> Self {
        RewardError::TaskFailed(err.to_string())
    }
}

impl From<tokio::sync::AcquireError> for RewardError {
    fn from(_: tokio::sync::AcquireError) -> Self {
        RewardError::ShutDown
    }
}
