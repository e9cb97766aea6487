//! Repository for the `repositories` table (candidate submissions).

use sqlx::PgPool;
use uuid::Uuid;

use codejudge_core::model::CreateRepository;
use codejudge_core::types::EntityId;

use crate::rows::RepositoryRow;

const COLUMNS: &str = "id, challenge_id, name, url, created_at";

/// CRUD operations for candidate repositories.
pub struct RepositoryRepo;

impl RepositoryRepo {
    /// Insert a new repository under its challenge.
    pub async fn create(
        pool: &PgPool,
        input: &CreateRepository,
    ) -> Result<RepositoryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO repositories (id, challenge_id, name, url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RepositoryRow>(&query)
            .bind(Uuid::new_v4())
            .bind(input.challenge_id)
            .bind(&input.name)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    /// List all repositories registered against a challenge.
    pub async fn list_for_challenge(
        pool: &PgPool,
        challenge_id: EntityId,
    ) -> Result<Vec<RepositoryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM repositories WHERE challenge_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, RepositoryRow>(&query)
            .bind(challenge_id)
            .fetch_all(pool)
            .await
    }

    /// Find a repository by id, scoped to its challenge.
    pub async fn find(
        pool: &PgPool,
        id: EntityId,
        challenge_id: EntityId,
    ) -> Result<Option<RepositoryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM repositories WHERE id = $1 AND challenge_id = $2");
        sqlx::query_as::<_, RepositoryRow>(&query)
            .bind(id)
            .bind(challenge_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a repository. Returns whether a row was removed.
    pub async fn delete(
        pool: &PgPool,
        id: EntityId,
        challenge_id: EntityId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM repositories WHERE id = $1 AND challenge_id = $2")
            .bind(id)
            .bind(challenge_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
