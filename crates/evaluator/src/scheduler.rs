//! Periodic background evaluation of active challenges.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use codejudge_core::model::Challenge;
use codejudge_db::repositories::ChallengeRepo;
use codejudge_db::DbPool;

use crate::service::EvaluationService;

/// Lower bound on the evaluation interval; agent runs are expensive.
pub const MIN_INTERVAL: Duration = Duration::from_secs(60);

/// Background service that re-evaluates every active challenge on a fixed
/// interval. The first iteration runs immediately on start.
pub struct EvaluationScheduler {
    pool: DbPool,
    interval: Duration,
}

impl EvaluationScheduler {
    /// Create a scheduler; intervals below [`MIN_INTERVAL`] are clamped.
    pub fn new(pool: DbPool, interval: Duration) -> Self {
        Self {
            pool,
            interval: interval.max(MIN_INTERVAL),
        }
    }

    /// Run the scheduler loop until the [`CancellationToken`] is cancelled.
    pub async fn run(&self, service: &EvaluationService, cancel: CancellationToken) {
        tracing::info!(interval_secs = self.interval.as_secs(), "Starting evaluation scheduler");
        let mut interval = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Evaluation scheduler cancelled");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.run_iteration(service).await {
                        tracing::error!(error = %e, "Scheduled evaluation iteration failed");
                    }
                }
            }
        }
    }

    /// Evaluate every active challenge once. Per-challenge failures are
    /// logged and skipped so one broken challenge cannot starve the rest.
    async fn run_iteration(&self, service: &EvaluationService) -> Result<(), sqlx::Error> {
        let challenges: Vec<Challenge> = ChallengeRepo::list(&self.pool)
            .await?
            .into_iter()
            .map(|row| row.into_challenge(Vec::new()))
            .collect();

        if challenges.is_empty() {
            tracing::debug!("No challenges found for scheduled evaluation");
            return Ok(());
        }

        for challenge in &challenges {
            if !challenge.active {
                tracing::debug!(challenge_id = %challenge.id, "Skipping inactive challenge");
                continue;
            }
            tracing::info!(challenge_id = %challenge.id, "Running scheduled evaluation");
            if let Err(e) = service.run_for_challenge(challenge.id, None).await {
                tracing::error!(
                    challenge_id = %challenge.id,
                    error = %e,
                    "Scheduled evaluation failed"
                );
            }
        }

        Ok(())
    }
}
