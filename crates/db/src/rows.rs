//! Row types mapping directly onto the database tables.
//!
//! Each row converts into the corresponding wire model from
//! `codejudge_core::model`; the repositories perform that conversion at
//! their boundary so callers never see sqlx types.

use sqlx::FromRow;

use codejudge_core::model::{Challenge, Criterion, EvaluationDetail, EvaluationState, Repository};
use codejudge_core::types::{EntityId, Timestamp};

/// A row from the `challenges` table. Criteria are loaded separately.
#[derive(Debug, Clone, FromRow)]
pub struct ChallengeRow {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub expected_outcome: String,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ChallengeRow {
    /// Assemble the wire model by attaching the challenge's criteria.
    pub fn into_challenge(self, criteria: Vec<Criterion>) -> Challenge {
        Challenge {
            id: self.id,
            name: self.name,
            description: self.description,
            expected_outcome: self.expected_outcome,
            active: self.active,
            created_at: self.created_at,
            criteria,
        }
    }
}

/// A row from the `criteria` table.
#[derive(Debug, Clone, FromRow)]
pub struct CriterionRow {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub name: String,
    pub description: String,
    pub score_multiplier: f64,
    pub code_concept: String,
}

impl From<CriterionRow> for Criterion {
    fn from(row: CriterionRow) -> Self {
        Criterion {
            id: row.id,
            challenge_id: row.challenge_id,
            name: row.name,
            description: row.description,
            score_multiplier: row.score_multiplier,
            code_concept: row.code_concept,
        }
    }
}

/// A row from the `repositories` table.
#[derive(Debug, Clone, FromRow)]
pub struct RepositoryRow {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub name: String,
    pub url: String,
    pub created_at: Timestamp,
}

impl From<RepositoryRow> for Repository {
    fn from(row: RepositoryRow) -> Self {
        Repository {
            id: row.id,
            challenge_id: row.challenge_id,
            name: row.name,
            url: row.url,
            created_at: row.created_at,
        }
    }
}

/// A row from the `evaluations` table.
///
/// `state` is stored as TEXT; conversion parses it leniently so unknown
/// values read back as `not_evaluated`.
#[derive(Debug, Clone, FromRow)]
pub struct EvaluationRow {
    pub id: EntityId,
    pub challenge_id: EntityId,
    pub repository_id: EntityId,
    pub criteria_id: EntityId,
    pub criteria_name: String,
    pub score: Option<f64>,
    pub state: String,
    pub reasoning: Option<String>,
    pub suggestion: Option<String>,
    pub updated_at: Timestamp,
}

impl From<EvaluationRow> for EvaluationDetail {
    fn from(row: EvaluationRow) -> Self {
        EvaluationDetail {
            id: row.id,
            challenge_id: row.challenge_id,
            repository_id: row.repository_id,
            criteria_id: row.criteria_id,
            criteria_name: row.criteria_name,
            score: row.score,
            state: EvaluationState::from_stored(&row.state),
            reasoning: row.reasoning,
            suggestion: row.suggestion,
            updated_at: row.updated_at,
        }
    }
}
