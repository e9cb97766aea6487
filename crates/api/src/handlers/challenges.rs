//! Handlers for challenge CRUD.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use codejudge_core::error::CoreError;
use codejudge_core::model::{Challenge, CreateChallenge, Criterion, UpdateChallenge};
use codejudge_core::types::EntityId;
use codejudge_core::validation;
use codejudge_db::repositories::{ChallengeRepo, CriterionRepo};
use codejudge_db::rows::ChallengeRow;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Load a challenge's criteria and assemble the wire model.
async fn assemble(pool: &sqlx::PgPool, row: ChallengeRow) -> AppResult<Challenge> {
    let criteria: Vec<Criterion> = CriterionRepo::list_for_challenge(pool, row.id)
        .await?
        .into_iter()
        .map(Criterion::from)
        .collect();
    Ok(row.into_challenge(criteria))
}

/// Verify that a challenge exists, returning the full row.
pub(crate) async fn ensure_challenge_exists(
    pool: &sqlx::PgPool,
    id: EntityId,
) -> AppResult<ChallengeRow> {
    ChallengeRepo::find_by_id(pool, id).await?.ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id,
        })
    })
}

// ---------------------------------------------------------------------------
// GET /challenges
// ---------------------------------------------------------------------------

/// List all challenges with their embedded criteria.
pub async fn list_challenges(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let rows = ChallengeRepo::list(&state.pool).await?;
    let mut challenges = Vec::with_capacity(rows.len());
    for row in rows {
        challenges.push(assemble(&state.pool, row).await?);
    }
    tracing::debug!(count = challenges.len(), "Listed challenges");
    Ok(Json(challenges))
}

// ---------------------------------------------------------------------------
// POST /challenges
// ---------------------------------------------------------------------------

/// Create a challenge, persisting any inline criteria with it.
pub async fn create_challenge(
    State(state): State<AppState>,
    Json(input): Json<CreateChallenge>,
) -> AppResult<impl IntoResponse> {
    validation::validate_challenge_name(&input.name)?;
    for criterion in &input.criteria {
        validation::validate_criterion_name(&criterion.name)?;
        validation::validate_score_multiplier(criterion.score_multiplier)?;
    }

    let row = ChallengeRepo::create(&state.pool, &input).await?;
    let mut criteria = Vec::with_capacity(input.criteria.len());
    for payload in &input.criteria {
        let created = CriterionRepo::create(&state.pool, row.id, payload).await?;
        criteria.push(Criterion::from(created));
    }

    tracing::info!(id = %row.id, name = %row.name, "Challenge created");
    Ok((StatusCode::CREATED, Json(row.into_challenge(criteria))))
}

// ---------------------------------------------------------------------------
// PATCH /challenges/{id}
// ---------------------------------------------------------------------------

/// Update a challenge. Only provided fields are applied.
pub async fn update_challenge(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateChallenge>,
) -> AppResult<impl IntoResponse> {
    ensure_challenge_exists(&state.pool, id).await?;
    if let Some(ref name) = input.name {
        validation::validate_challenge_name(name)?;
    }

    let updated = ChallengeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id,
        }))?;
    tracing::info!(id = %updated.id, "Challenge updated");
    Ok(Json(assemble(&state.pool, updated).await?))
}

// ---------------------------------------------------------------------------
// DELETE /challenges/{id}
// ---------------------------------------------------------------------------

/// Delete a challenge and everything hanging off it.
pub async fn delete_challenge(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    let deleted = ChallengeRepo::delete(&state.pool, id).await?;
    if deleted {
        tracing::info!(%id, "Challenge deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Challenge",
            id,
        }))
    }
}
