use crate::application::rewards::RewardEngine;
use crate::domain::error::RewardError;
use crate::domain::traits::LocationProvider;
use crate::infrastructure::config::Config;
use crate::infrastructure::providers::DigestPointsProvider;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<RewardEngine>,
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub async fn new(
        locations: &dyn LocationProvider,
        config: Config,
    ) -> Result<Self, RewardError> {
        let points = Arc::new(DigestPointsProvider::new(Duration::from_millis(
            config.reward_points.latency_ms,
        )));
        let engine = RewardEngine::new(locations, points, &config.engine).await?;

        Ok(Self {
            engine: Arc::new(engine),
            config: Arc::new(RwLock::new(config)),
        })
    }
}
