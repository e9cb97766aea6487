//! Per-challenge evaluation orchestration.

use std::sync::Arc;

use codejudge_core::model::{Criterion, EvaluationState, Repository};
use codejudge_core::types::EntityId;
use codejudge_db::repositories::{CriterionRepo, EvaluationRepo, RepositoryRepo};
use codejudge_db::DbPool;

use crate::agent::{AgentClient, AgentConfig, AgentError, HttpAgentClient};
use crate::github::{SnapshotError, SnapshotFetcher};

/// Errors from an evaluation run.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

/// Coordinates evaluations across the repositories and criteria of a
/// challenge.
///
/// Each (repository, criterion) pair is driven through the lifecycle
/// `not_evaluated -> under_evaluation -> evaluated`: the pending row is
/// marked in-flight, the repository is snapshotted, the agent produces a
/// verdict, and the result is persisted before the row is closed out.
pub struct EvaluationService {
    pool: DbPool,
    agent: Arc<dyn AgentClient>,
    snapshots: SnapshotFetcher,
}

impl EvaluationService {
    pub fn new(pool: DbPool, agent: Arc<dyn AgentClient>, snapshots: SnapshotFetcher) -> Self {
        Self {
            pool,
            agent,
            snapshots,
        }
    }

    /// Build a service from environment configuration. Fails when the agent
    /// endpoint is not configured.
    pub fn from_env(pool: DbPool) -> Result<Self, AgentError> {
        let config = AgentConfig::from_env();
        let agent = HttpAgentClient::new(&config)?;
        Ok(Self::new(
            pool,
            Arc::new(agent),
            SnapshotFetcher::new(config.github_token),
        ))
    }

    /// Evaluate every (criterion, repository) pair of a challenge.
    ///
    /// `criteria_ids`, when given, restricts the run to the named criteria.
    /// Pairs run sequentially; a failure aborts the remainder of the run and
    /// leaves the failed row `under_evaluation` for the next pass to reset.
    pub async fn run_for_challenge(
        &self,
        challenge_id: EntityId,
        criteria_ids: Option<&[EntityId]>,
    ) -> Result<(), ServiceError> {
        let criteria: Vec<Criterion> = CriterionRepo::list_for_challenge(&self.pool, challenge_id)
            .await?
            .into_iter()
            .map(Criterion::from)
            .collect();
        let criteria = filter_criteria(criteria, criteria_ids);

        let repositories: Vec<Repository> =
            RepositoryRepo::list_for_challenge(&self.pool, challenge_id)
                .await?
                .into_iter()
                .map(Repository::from)
                .collect();

        tracing::info!(
            %challenge_id,
            criteria = criteria.len(),
            repositories = repositories.len(),
            "Starting evaluation run"
        );

        for criterion in &criteria {
            for repository in &repositories {
                self.evaluate_pair(challenge_id, repository, criterion)
                    .await?;
            }
        }

        Ok(())
    }

    async fn evaluate_pair(
        &self,
        challenge_id: EntityId,
        repository: &Repository,
        criterion: &Criterion,
    ) -> Result<(), ServiceError> {
        let row = EvaluationRepo::upsert_pending(
            &self.pool,
            challenge_id,
            repository.id,
            criterion.id,
            &criterion.name,
        )
        .await?;

        EvaluationRepo::set_state(&self.pool, row.id, EvaluationState::UnderEvaluation).await?;

        let files = self.snapshots.fetch(&repository.url).await?;
        let payload = serde_json::json!({
            "criteria": {
                "name": criterion.name,
                "description": criterion.description,
                "score_multiplier": criterion.score_multiplier,
                "code_concept": criterion.code_concept,
            },
            "repository": {
                "name": repository.name,
                "url": repository.url,
                "files": files,
            },
        });

        let outcome = self.agent.evaluate(&payload).await?;
        EvaluationRepo::record_result(
            &self.pool,
            row.id,
            outcome.score,
            outcome.reasoning.as_deref(),
            outcome.suggestion.as_deref(),
        )
        .await?;
        EvaluationRepo::set_state(&self.pool, row.id, EvaluationState::Evaluated).await?;

        tracing::debug!(
            repository_id = %repository.id,
            criteria_id = %criterion.id,
            score = ?outcome.score,
            "Evaluation recorded"
        );
        Ok(())
    }
}

/// Restrict a criteria list to the requested ids; `None` keeps everything.
fn filter_criteria(criteria: Vec<Criterion>, ids: Option<&[EntityId]>) -> Vec<Criterion> {
    match ids {
        Some(ids) => criteria
            .into_iter()
            .filter(|c| ids.contains(&c.id))
            .collect(),
        None => criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn criterion(name: &str) -> Criterion {
        Criterion {
            id: Uuid::new_v4(),
            challenge_id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            score_multiplier: 1.0,
            code_concept: String::new(),
        }
    }

    #[test]
    fn filter_keeps_everything_without_ids() {
        let criteria = vec![criterion("a"), criterion("b")];
        assert_eq!(filter_criteria(criteria, None).len(), 2);
    }

    #[test]
    fn filter_restricts_to_requested_ids() {
        let keep = criterion("keep");
        let drop = criterion("drop");
        let wanted = [keep.id];
        let filtered = filter_criteria(vec![keep.clone(), drop], Some(&wanted));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, keep.id);
    }

    #[test]
    fn filter_with_unknown_ids_yields_empty() {
        let criteria = vec![criterion("a")];
        let wanted = [Uuid::new_v4()];
        assert!(filter_criteria(criteria, Some(&wanted)).is_empty());
    }
}
