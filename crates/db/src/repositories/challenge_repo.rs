//! Repository for the `challenges` table.

use sqlx::PgPool;
use uuid::Uuid;

use codejudge_core::model::{CreateChallenge, UpdateChallenge};
use codejudge_core::types::EntityId;

use crate::rows::ChallengeRow;

const COLUMNS: &str = "id, name, description, expected_outcome, active, created_at, updated_at";

/// CRUD operations for challenges. Criteria are managed by
/// [`CriterionRepo`](crate::repositories::CriterionRepo).
pub struct ChallengeRepo;

impl ChallengeRepo {
    /// Insert a new challenge, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateChallenge,
    ) -> Result<ChallengeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO challenges (id, name, description, expected_outcome, active) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeRow>(&query)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.expected_outcome)
            .bind(input.active)
            .fetch_one(pool)
            .await
    }

    /// List all challenges, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ChallengeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges ORDER BY created_at DESC");
        sqlx::query_as::<_, ChallengeRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Find a challenge by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<ChallengeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM challenges WHERE id = $1");
        sqlx::query_as::<_, ChallengeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a challenge. Only non-`None` fields are applied; `updated_at`
    /// is always refreshed.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateChallenge,
    ) -> Result<Option<ChallengeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE challenges SET \
                name = COALESCE($2, name), \
                description = COALESCE($3, description), \
                expected_outcome = COALESCE($4, expected_outcome), \
                active = COALESCE($5, active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChallengeRow>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.expected_outcome)
            .bind(input.active)
            .fetch_optional(pool)
            .await
    }

    /// Delete a challenge (criteria, repositories, and evaluations cascade).
    /// Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM challenges WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
