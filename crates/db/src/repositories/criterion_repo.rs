//! Repository for the `criteria` table.

use sqlx::PgPool;
use uuid::Uuid;

use codejudge_core::model::{CriterionPayload, UpdateCriterion};
use codejudge_core::types::EntityId;

use crate::rows::CriterionRow;

const COLUMNS: &str = "id, challenge_id, name, description, score_multiplier, code_concept";

/// CRUD operations for evaluation criteria.
pub struct CriterionRepo;

impl CriterionRepo {
    /// Insert a new criterion under the given challenge.
    pub async fn create(
        pool: &PgPool,
        challenge_id: EntityId,
        input: &CriterionPayload,
    ) -> Result<CriterionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO criteria \
                (id, challenge_id, name, description, score_multiplier, code_concept) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(Uuid::new_v4())
            .bind(challenge_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.score_multiplier)
            .bind(&input.code_concept)
            .fetch_one(pool)
            .await
    }

    /// List all criteria belonging to a challenge, in insertion order.
    pub async fn list_for_challenge(
        pool: &PgPool,
        challenge_id: EntityId,
    ) -> Result<Vec<CriterionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM criteria WHERE challenge_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(challenge_id)
            .fetch_all(pool)
            .await
    }

    /// Find a criterion by id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: EntityId,
    ) -> Result<Option<CriterionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM criteria WHERE id = $1");
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a criterion. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: EntityId,
        input: &UpdateCriterion,
    ) -> Result<Option<CriterionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE criteria SET \
                description = COALESCE($2, description), \
                score_multiplier = COALESCE($3, score_multiplier), \
                code_concept = COALESCE($4, code_concept), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CriterionRow>(&query)
            .bind(id)
            .bind(&input.description)
            .bind(input.score_multiplier)
            .bind(&input.code_concept)
            .fetch_optional(pool)
            .await
    }
}
