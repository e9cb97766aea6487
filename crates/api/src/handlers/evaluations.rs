//! Handlers for triggering evaluations and reading their results.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use codejudge_core::model::{
    EvaluationDetail, EvaluationHistory, EvaluationRequest, RankResponse, Repository, TriggerAck,
};
use codejudge_core::ranking;
use codejudge_core::types::EntityId;
use codejudge_db::repositories::{EvaluationRepo, RepositoryRepo};
use codejudge_evaluator::EvaluationService;

use crate::error::{AppError, AppResult};
use crate::handlers::challenges::ensure_challenge_exists;
use crate::middleware::locale::Translator;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /evaluations/trigger
// ---------------------------------------------------------------------------

/// Kick off an evaluation run for a challenge in the background.
///
/// The run itself is detached: the response acknowledges the start, and
/// clients observe progress through the status and rank endpoints.
pub async fn trigger_evaluation(
    State(state): State<AppState>,
    Json(input): Json<EvaluationRequest>,
) -> AppResult<impl IntoResponse> {
    ensure_challenge_exists(&state.pool, input.challenge_id).await?;

    let service = EvaluationService::from_env(state.pool.clone())
        .map_err(|e| AppError::Internal(format!("Evaluation agent unavailable: {e}")))?;

    let challenge_id = input.challenge_id;
    let criteria_ids = input.criteria_ids;
    tokio::spawn(async move {
        if let Err(error) = service
            .run_for_challenge(challenge_id, criteria_ids.as_deref())
            .await
        {
            tracing::error!(%challenge_id, %error, "Evaluation run failed");
        }
    });

    tracing::info!(%challenge_id, "Evaluation run started");
    Ok((
        StatusCode::ACCEPTED,
        Json(TriggerAck {
            status: "started".to_string(),
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /evaluations/status/{challenge_id}
// ---------------------------------------------------------------------------

/// Per-repository evaluation status for a challenge, sorted by name.
pub async fn evaluation_status(
    State(state): State<AppState>,
    Path(challenge_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    ensure_challenge_exists(&state.pool, challenge_id).await?;
    let (repositories, evaluations) = load_challenge_records(&state, challenge_id).await?;
    let statuses = ranking::compute_status(challenge_id, &repositories, &evaluations);
    Ok(Json(statuses))
}

// ---------------------------------------------------------------------------
// GET /evaluations/rank/{challenge_id}
// ---------------------------------------------------------------------------

/// The ranking of all repositories for a challenge, best score first.
pub async fn evaluation_rank(
    State(state): State<AppState>,
    Translator(t): Translator,
    Path(challenge_id): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    ensure_challenge_exists(&state.pool, challenge_id).await?;
    let (repositories, evaluations) = load_challenge_records(&state, challenge_id).await?;
    if repositories.is_empty() {
        return Err(AppError::NotFound(
            t.translate("repositories.none_registered"),
        ));
    }

    let entries = ranking::compute_rank_entries(&repositories, &evaluations);
    Ok(Json(RankResponse {
        challenge_id,
        entries,
        generated_at: chrono::Utc::now(),
    }))
}

// ---------------------------------------------------------------------------
// GET /evaluations/repository/{challenge_id}/{repository_id}
// ---------------------------------------------------------------------------

/// Full evaluation history for one repository.
pub async fn evaluation_history(
    State(state): State<AppState>,
    Translator(t): Translator,
    Path((challenge_id, repository_id)): Path<(EntityId, EntityId)>,
) -> AppResult<impl IntoResponse> {
    let repository = RepositoryRepo::find(&state.pool, repository_id, challenge_id)
        .await?
        .map(Repository::from)
        .ok_or_else(|| AppError::NotFound(t.translate("repositories.not_found")))?;

    let evaluations: Vec<EvaluationDetail> =
        EvaluationRepo::list_for_repository(&state.pool, repository_id)
            .await?
            .into_iter()
            .map(EvaluationDetail::from)
            .collect();

    Ok(Json(EvaluationHistory {
        repository,
        evaluations,
    }))
}

/// Load the repositories and evaluation records of a challenge in one go.
async fn load_challenge_records(
    state: &AppState,
    challenge_id: EntityId,
) -> AppResult<(Vec<Repository>, Vec<EvaluationDetail>)> {
    let repositories: Vec<Repository> =
        RepositoryRepo::list_for_challenge(&state.pool, challenge_id)
            .await?
            .into_iter()
            .map(Repository::from)
            .collect();
    let evaluations: Vec<EvaluationDetail> =
        EvaluationRepo::list_for_challenge(&state.pool, challenge_id)
            .await?
            .into_iter()
            .map(EvaluationDetail::from)
            .collect();
    Ok((repositories, evaluations))
}
