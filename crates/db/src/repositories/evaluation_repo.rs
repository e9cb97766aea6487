//! Repository for the `evaluations` table.
//!
//! Evaluations are keyed by the (repository, criterion) pair: re-running an
//! evaluation upserts the existing row back to `not_evaluated` instead of
//! accumulating history rows.

use sqlx::PgPool;
use uuid::Uuid;

use codejudge_core::model::EvaluationState;
use codejudge_core::types::EntityId;

use crate::rows::EvaluationRow;

const COLUMNS: &str = "id, challenge_id, repository_id, criteria_id, criteria_name, \
     score, state, reasoning, suggestion, updated_at";

/// Query access for evaluation records.
pub struct EvaluationRepo;

impl EvaluationRepo {
    /// Ensure a pending evaluation row exists for a (repository, criterion)
    /// pair, resetting any previous result for a fresh run.
    pub async fn upsert_pending(
        pool: &PgPool,
        challenge_id: EntityId,
        repository_id: EntityId,
        criteria_id: EntityId,
        criteria_name: &str,
    ) -> Result<EvaluationRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO evaluations \
                (id, challenge_id, repository_id, criteria_id, criteria_name, state) \
             VALUES ($1, $2, $3, $4, $5, 'not_evaluated') \
             ON CONFLICT ON CONSTRAINT uq_evaluations_repository_criteria DO UPDATE SET \
                criteria_name = EXCLUDED.criteria_name, \
                state = 'not_evaluated', \
                updated_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EvaluationRow>(&query)
            .bind(Uuid::new_v4())
            .bind(challenge_id)
            .bind(repository_id)
            .bind(criteria_id)
            .bind(criteria_name)
            .fetch_one(pool)
            .await
    }

    /// List all evaluation records for a challenge.
    pub async fn list_for_challenge(
        pool: &PgPool,
        challenge_id: EntityId,
    ) -> Result<Vec<EvaluationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM evaluations WHERE challenge_id = $1 ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, EvaluationRow>(&query)
            .bind(challenge_id)
            .fetch_all(pool)
            .await
    }

    /// List all evaluation records for a repository.
    pub async fn list_for_repository(
        pool: &PgPool,
        repository_id: EntityId,
    ) -> Result<Vec<EvaluationRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM evaluations WHERE repository_id = $1 ORDER BY updated_at ASC"
        );
        sqlx::query_as::<_, EvaluationRow>(&query)
            .bind(repository_id)
            .fetch_all(pool)
            .await
    }

    /// Move an evaluation to a new lifecycle state.
    pub async fn set_state(
        pool: &PgPool,
        id: EntityId,
        state: EvaluationState,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE evaluations SET state = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(state.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Persist the agent's verdict for an evaluation.
    pub async fn record_result(
        pool: &PgPool,
        id: EntityId,
        score: Option<f64>,
        reasoning: Option<&str>,
        suggestion: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE evaluations SET \
                score = $2, reasoning = $3, suggestion = $4, updated_at = now() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(score)
        .bind(reasoning)
        .bind(suggestion)
        .execute(pool)
        .await?;
        Ok(())
    }
}
