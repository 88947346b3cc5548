use crate::application::rewards::RewardEngine;
use crate::domain::error::RewardError;
use crate::domain::model::User;
use futures_util::{stream, StreamExt, TryStreamExt};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub users: usize,
    pub rewards_granted: usize,
    pub elapsed: Duration,
}

/// Runs `calculate_rewards` for every user, at most `concurrency` at a time.
///
/// Stops at the first failing user. Users already finished keep their rewards.
/// `on_done` is called once per completed user, in completion order.
pub async fn calculate_rewards_for_all<F>(
    engine: &RewardEngine,
    users: &[User],
    concurrency: usize,
    mut on_done: F,
) -> Result<BatchSummary, RewardError>
where
    F: FnMut(&User, usize),
{
    let started = Instant::now();
    let mut rewards_granted = 0;

    let mut runs = stream::iter(users)
        .map(|user| async move {
            let granted = engine.calculate_rewards(user).await?;
            Ok::<_, RewardError>((user, granted.len()))
        })
        .buffer_unordered(concurrency.max(1));

    while let Some((user, granted)) = runs.try_next().await? {
        rewards_granted += granted;
        on_done(user, granted);
    }

    let summary = BatchSummary {
        users: users.len(),
        rewards_granted,
        elapsed: started.elapsed(),
    };
    tracing::info!(
        users = summary.users,
        rewards = summary.rewards_granted,
        elapsed_ms = summary.elapsed.as_millis() as u64,
        "batch reward calculation finished"
    );
    Ok(summary)
}
