//! Wire and domain models shared by the API server and the client.
//!
//! These structs serialize to the JSON bodies exchanged over the REST
//! interface. Database row types live in `codejudge-db` and convert into
//! these via `From` impls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Evaluation state
// ---------------------------------------------------------------------------

/// Lifecycle state of a single (repository, criterion) evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationState {
    /// No evaluation has run yet.
    #[default]
    NotEvaluated,
    /// The evaluation agent is currently working on it.
    UnderEvaluation,
    /// The agent has produced a result.
    Evaluated,
}

impl EvaluationState {
    /// Parse a stored state string, decaying unknown values to
    /// [`EvaluationState::NotEvaluated`] rather than failing. Persisted
    /// rows written by older versions must never poison a read path.
    pub fn from_stored(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// The snake_case string form used in storage and on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationState::NotEvaluated => "not_evaluated",
            EvaluationState::UnderEvaluation => "under_evaluation",
            EvaluationState::Evaluated => "evaluated",
        }
    }
}

impl fmt::Display for EvaluationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EvaluationState {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "not_evaluated" => Ok(EvaluationState::NotEvaluated),
            "under_evaluation" => Ok(EvaluationState::UnderEvaluation),
            "evaluated" => Ok(EvaluationState::Evaluated),
            _ => Err(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Challenges & criteria
// ---------------------------------------------------------------------------

/// A persisted evaluation criterion, owned by exactly one challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub name: String,
    pub description: String,
    pub score_multiplier: f64,
    pub code_concept: String,
}

/// Criterion fields as supplied inline on challenge creation (no ids yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionPayload {
    pub name: String,
    pub description: String,
    pub score_multiplier: f64,
    pub code_concept: String,
}

/// Request body for `POST /criteria`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCriterion {
    pub challenge_id: EntityId,
    pub name: String,
    pub description: String,
    pub score_multiplier: f64,
    pub code_concept: String,
}

/// Request body for `PATCH /criteria/{id}`. Only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCriterion {
    pub description: Option<String>,
    pub score_multiplier: Option<f64>,
    pub code_concept: Option<String>,
}

/// A coding challenge with its embedded criteria.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub expected_outcome: String,
    pub active: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

/// Request body for `POST /challenges`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChallenge {
    pub name: String,
    pub description: String,
    pub expected_outcome: String,
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub criteria: Vec<CriterionPayload>,
}

fn default_active() -> bool {
    true
}

/// Request body for `PATCH /challenges/{id}`. Only provided fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChallenge {
    pub name: Option<String>,
    pub description: Option<String>,
    pub expected_outcome: Option<String>,
    pub active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

/// A candidate repository registered against a challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repository {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub name: String,
    pub url: String,
    pub created_at: Timestamp,
}

/// Request body for `POST /repositories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRepository {
    pub challenge_id: EntityId,
    pub name: String,
    pub url: String,
}

// ---------------------------------------------------------------------------
// Evaluations
// ---------------------------------------------------------------------------

/// One evaluation record: the agent's verdict for a (repository, criterion)
/// pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDetail {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub repository_id: EntityId,
    pub criteria_id: EntityId,
    pub criteria_name: String,
    pub score: Option<f64>,
    pub state: EvaluationState,
    pub reasoning: Option<String>,
    pub suggestion: Option<String>,
    pub updated_at: Timestamp,
}

/// Request body for `POST /evaluations/trigger`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub challenge_id: EntityId,
    #[serde(default)]
    pub criteria_ids: Option<Vec<EntityId>>,
}

/// Acknowledgement returned by `POST /evaluations/trigger`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerAck {
    pub status: String,
}

/// Per-repository status summary for `GET /evaluations/status/{challenge_id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStatus {
    pub repository_id: EntityId,
    pub repository_name: String,
    pub challenge_id: EntityId,
    pub state: EvaluationState,
    pub last_updated: Timestamp,
}

/// A computed ranking row for one repository.
///
/// Invariant: `unscored` is true iff `total_score` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    pub repository_id: EntityId,
    pub repository_name: String,
    pub repository_url: String,
    pub total_score: Option<f64>,
    pub status: EvaluationState,
    pub unscored: bool,
}

/// Response body for `GET /evaluations/rank/{challenge_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankResponse {
    pub challenge_id: EntityId,
    pub entries: Vec<RankEntry>,
    pub generated_at: Timestamp,
}

/// Response body for `GET /evaluations/repository/{challenge_id}/{repository_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationHistory {
    pub repository: Repository,
    pub evaluations: Vec<EvaluationDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluation_state_round_trips_through_snake_case() {
        let json = serde_json::to_string(&EvaluationState::UnderEvaluation).unwrap();
        assert_eq!(json, "\"under_evaluation\"");
        let back: EvaluationState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, EvaluationState::UnderEvaluation);
    }

    #[test]
    fn unknown_stored_state_decays_to_not_evaluated() {
        assert_eq!(
            EvaluationState::from_stored("corrupted"),
            EvaluationState::NotEvaluated
        );
        assert_eq!(
            EvaluationState::from_stored("evaluated"),
            EvaluationState::Evaluated
        );
    }

    #[test]
    fn create_challenge_defaults_active_and_criteria() {
        let challenge: CreateChallenge = serde_json::from_str(
            r#"{"name":"Rust CLI","description":"d","expected_outcome":"o"}"#,
        )
        .unwrap();
        assert!(challenge.active);
        assert!(challenge.criteria.is_empty());
    }
}
