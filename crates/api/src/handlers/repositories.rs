//! Handlers for candidate repository registration.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use codejudge_core::error::CoreError;
use codejudge_core::model::{CreateRepository, Repository};
use codejudge_core::types::EntityId;
use codejudge_core::validation;
use codejudge_db::repositories::RepositoryRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::challenges::ensure_challenge_exists;
use crate::state::AppState;

/// Query parameters scoping single-repository lookups to a challenge.
#[derive(Debug, Deserialize)]
pub struct RepositoryScope {
    pub challenge_id: EntityId,
}

// ---------------------------------------------------------------------------
// POST /repositories
// ---------------------------------------------------------------------------

/// Register a candidate repository against a challenge.
pub async fn create_repository(
    State(state): State<AppState>,
    Json(input): Json<CreateRepository>,
) -> AppResult<impl IntoResponse> {
    validation::validate_repository_url(&input.url)?;
    ensure_challenge_exists(&state.pool, input.challenge_id).await?;

    let created = RepositoryRepo::create(&state.pool, &input).await?;
    tracing::info!(id = %created.id, url = %created.url, "Repository registered");
    Ok((StatusCode::CREATED, Json(Repository::from(created))))
}

// ---------------------------------------------------------------------------
// GET /repositories/challenges/{challenge_id}
// ---------------------------------------------------------------------------

/// List all repositories registered against a challenge.
pub async fn list_repositories(
    State(state): State<AppState>,
    Path(challenge_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let repositories: Vec<Repository> =
        RepositoryRepo::list_for_challenge(&state.pool, challenge_id)
            .await?
            .into_iter()
            .map(Repository::from)
            .collect();
    Ok(Json(repositories))
}

// ---------------------------------------------------------------------------
// GET /repositories/{id}
// ---------------------------------------------------------------------------

/// Fetch a single repository, scoped to its challenge.
pub async fn get_repository(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(scope): Query<RepositoryScope>,
) -> AppResult<impl IntoResponse> {
    let row = RepositoryRepo::find(&state.pool, id, scope.challenge_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Repository",
            id,
        }))?;
    Ok(Json(Repository::from(row)))
}

// ---------------------------------------------------------------------------
// DELETE /repositories/{id}
// ---------------------------------------------------------------------------

/// Remove a repository. Its evaluation records cascade away with it.
pub async fn delete_repository(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Query(scope): Query<RepositoryScope>,
) -> AppResult<impl IntoResponse> {
    let removed = RepositoryRepo::delete(&state.pool, id, scope.challenge_id).await?;
    if !removed {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Repository",
            id,
        }));
    }
    tracing::info!(%id, "Repository deleted");
    Ok(StatusCode::NO_CONTENT)
}
