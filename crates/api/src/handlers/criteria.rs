//! Handlers for criteria management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use codejudge_core::error::CoreError;
use codejudge_core::model::{CreateCriterion, Criterion, CriterionPayload, UpdateCriterion};
use codejudge_core::types::EntityId;
use codejudge_core::validation;
use codejudge_db::repositories::CriterionRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::challenges::ensure_challenge_exists;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /criteria
// ---------------------------------------------------------------------------

/// Add a criterion to an existing challenge.
pub async fn create_criterion(
    State(state): State<AppState>,
    Json(input): Json<CreateCriterion>,
) -> AppResult<impl IntoResponse> {
    validation::validate_criterion_name(&input.name)?;
    validation::validate_score_multiplier(input.score_multiplier)?;

    ensure_challenge_exists(&state.pool, input.challenge_id).await?;

    let payload = CriterionPayload {
        name: input.name,
        description: input.description,
        score_multiplier: input.score_multiplier,
        code_concept: input.code_concept,
    };
    let created = CriterionRepo::create(&state.pool, input.challenge_id, &payload).await?;
    tracing::info!(id = %created.id, challenge_id = %created.challenge_id, "Criterion created");
    Ok((StatusCode::CREATED, Json(Criterion::from(created))))
}

// ---------------------------------------------------------------------------
// GET /criteria/{challenge_id}
// ---------------------------------------------------------------------------

/// List all criteria belonging to a challenge.
pub async fn list_criteria(
    State(state): State<AppState>,
    Path(challenge_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    let criteria: Vec<Criterion> = CriterionRepo::list_for_challenge(&state.pool, challenge_id)
        .await?
        .into_iter()
        .map(Criterion::from)
        .collect();
    Ok(Json(criteria))
}

// ---------------------------------------------------------------------------
// PATCH /criteria/{id}
// ---------------------------------------------------------------------------

/// Update a criterion. Only provided fields are applied.
pub async fn update_criterion(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
    Json(input): Json<UpdateCriterion>,
) -> AppResult<impl IntoResponse> {
    if let Some(multiplier) = input.score_multiplier {
        validation::validate_score_multiplier(multiplier)?;
    }

    let updated = CriterionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Criterion",
            id,
        }))?;
    tracing::info!(id = %updated.id, "Criterion updated");
    Ok(Json(Criterion::from(updated)))
}
