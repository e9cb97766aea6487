//! Ranking and status aggregation over evaluation records.
//!
//! Pure functions: the API handlers load rows and delegate the derivation of
//! rank entries and per-repository status summaries here, so the ordering and
//! scoring rules stay unit-testable without a database.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::{EvaluationDetail, EvaluationState, EvaluationStatus, RankEntry, Repository};
use crate::types::EntityId;

/// Collapse the states of all evaluations for one repository into a single
/// repository-level status.
///
/// - Any in-flight evaluation makes the whole repository `under_evaluation`.
/// - `evaluated` only when every record is evaluated (and at least one exists).
/// - Everything else (no records, or a mix with pending work) is `not_evaluated`.
pub fn resolve_overall_state(states: &[EvaluationState]) -> EvaluationState {
    if states.contains(&EvaluationState::UnderEvaluation) {
        return EvaluationState::UnderEvaluation;
    }
    if !states.is_empty() && states.iter().all(|s| *s == EvaluationState::Evaluated) {
        return EvaluationState::Evaluated;
    }
    EvaluationState::NotEvaluated
}

/// Compute ranking entries for a challenge.
///
/// `total_score` is the mean of the non-null scores across the repository's
/// evaluations, or `None` when nothing has been scored. `unscored` is true
/// iff `total_score` is `None`. Entries are ordered scored-first by
/// descending score, with unscored repositories trailing.
pub fn compute_rank_entries(
    repositories: &[Repository],
    evaluations: &[EvaluationDetail],
) -> Vec<RankEntry> {
    let mut grouped: HashMap<EntityId, Vec<&EvaluationDetail>> = HashMap::new();
    for evaluation in evaluations {
        grouped
            .entry(evaluation.repository_id)
            .or_default()
            .push(evaluation);
    }

    let mut entries: Vec<RankEntry> = repositories
        .iter()
        .map(|repo| {
            let repo_evaluations = grouped.get(&repo.id).map_or(&[][..], Vec::as_slice);
            let scores: Vec<f64> = repo_evaluations.iter().filter_map(|e| e.score).collect();
            let total_score = if scores.is_empty() {
                None
            } else {
                Some(scores.iter().sum::<f64>() / scores.len() as f64)
            };
            let states: Vec<EvaluationState> =
                repo_evaluations.iter().map(|e| e.state).collect();

            RankEntry {
                repository_id: repo.id,
                repository_name: repo.name.clone(),
                repository_url: repo.url.clone(),
                unscored: total_score.is_none(),
                total_score,
                status: resolve_overall_state(&states),
            }
        })
        .collect();

    entries.sort_by(|a, b| match (a.total_score, b.total_score) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    entries
}

/// Compute the per-repository status list for a challenge.
///
/// Every repository starts as `not_evaluated` at its creation time; each
/// evaluation record then overrides the repository's state and timestamp in
/// record order (last write wins). Records referencing repositories outside
/// the given list are ignored. The result is sorted by repository name,
/// case-insensitively.
pub fn compute_status(
    challenge_id: EntityId,
    repositories: &[Repository],
    evaluations: &[EvaluationDetail],
) -> Vec<EvaluationStatus> {
    let mut latest: HashMap<EntityId, EvaluationStatus> = repositories
        .iter()
        .map(|repo| {
            (
                repo.id,
                EvaluationStatus {
                    repository_id: repo.id,
                    repository_name: repo.name.clone(),
                    challenge_id,
                    state: EvaluationState::NotEvaluated,
                    last_updated: repo.created_at,
                },
            )
        })
        .collect();

    for evaluation in evaluations {
        if let Some(status) = latest.get_mut(&evaluation.repository_id) {
            status.state = evaluation.state;
            status.last_updated = evaluation.updated_at;
        }
    }

    let mut statuses: Vec<EvaluationStatus> = latest.into_values().collect();
    statuses.sort_by_key(|s| s.repository_name.to_lowercase());
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn repo(name: &str) -> Repository {
        Repository {
            id: Uuid::new_v4(),
            challenge_id: Uuid::new_v4(),
            name: name.to_string(),
            url: format!("https://github.com/acme/{name}"),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn evaluation(
        repository_id: EntityId,
        score: Option<f64>,
        state: EvaluationState,
    ) -> EvaluationDetail {
        EvaluationDetail {
            id: Uuid::new_v4(),
            challenge_id: Uuid::new_v4(),
            repository_id,
            criteria_id: Uuid::new_v4(),
            criteria_name: "Style".to_string(),
            score,
            state,
            reasoning: None,
            suggestion: None,
            updated_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        }
    }

    // --- Overall state resolution ---

    #[test]
    fn any_in_flight_evaluation_wins() {
        let states = [
            EvaluationState::Evaluated,
            EvaluationState::UnderEvaluation,
            EvaluationState::NotEvaluated,
        ];
        assert_eq!(
            resolve_overall_state(&states),
            EvaluationState::UnderEvaluation
        );
    }

    #[test]
    fn fully_evaluated_only_when_uniform() {
        assert_eq!(
            resolve_overall_state(&[EvaluationState::Evaluated, EvaluationState::Evaluated]),
            EvaluationState::Evaluated
        );
        assert_eq!(
            resolve_overall_state(&[EvaluationState::Evaluated, EvaluationState::NotEvaluated]),
            EvaluationState::NotEvaluated
        );
        assert_eq!(resolve_overall_state(&[]), EvaluationState::NotEvaluated);
    }

    // --- Rank computation ---

    #[test]
    fn unscored_iff_total_score_is_none() {
        let scored = repo("scored");
        let partial = repo("partial");
        let untouched = repo("untouched");
        let evaluations = vec![
            evaluation(scored.id, Some(8.0), EvaluationState::Evaluated),
            evaluation(scored.id, Some(6.0), EvaluationState::Evaluated),
            evaluation(partial.id, Some(4.0), EvaluationState::Evaluated),
            evaluation(partial.id, None, EvaluationState::UnderEvaluation),
        ];

        let entries = compute_rank_entries(
            &[scored.clone(), partial.clone(), untouched.clone()],
            &evaluations,
        );

        for entry in &entries {
            assert_eq!(entry.unscored, entry.total_score.is_none());
        }
        let untouched_entry = entries
            .iter()
            .find(|e| e.repository_id == untouched.id)
            .unwrap();
        assert!(untouched_entry.unscored);
        // A partially scored repository still has a mean and is not unscored.
        let partial_entry = entries
            .iter()
            .find(|e| e.repository_id == partial.id)
            .unwrap();
        assert_eq!(partial_entry.total_score, Some(4.0));
        assert!(!partial_entry.unscored);
    }

    #[test]
    fn total_score_is_mean_of_scored_evaluations() {
        let r = repo("avg");
        let evaluations = vec![
            evaluation(r.id, Some(10.0), EvaluationState::Evaluated),
            evaluation(r.id, Some(5.0), EvaluationState::Evaluated),
            evaluation(r.id, None, EvaluationState::NotEvaluated),
        ];
        let entries = compute_rank_entries(std::slice::from_ref(&r), &evaluations);
        assert_eq!(entries[0].total_score, Some(7.5));
    }

    #[test]
    fn entries_sorted_scored_first_descending() {
        let low = repo("low");
        let high = repo("high");
        let unscored = repo("unscored");
        let evaluations = vec![
            evaluation(low.id, Some(3.0), EvaluationState::Evaluated),
            evaluation(high.id, Some(9.0), EvaluationState::Evaluated),
        ];

        let entries = compute_rank_entries(
            &[unscored.clone(), low.clone(), high.clone()],
            &evaluations,
        );

        assert_eq!(entries[0].repository_id, high.id);
        assert_eq!(entries[1].repository_id, low.id);
        assert_eq!(entries[2].repository_id, unscored.id);
    }

    #[test]
    fn repository_status_reflects_mixed_states() {
        let r = repo("mixed");
        let evaluations = vec![
            evaluation(r.id, Some(7.0), EvaluationState::Evaluated),
            evaluation(r.id, None, EvaluationState::UnderEvaluation),
        ];
        let entries = compute_rank_entries(std::slice::from_ref(&r), &evaluations);
        assert_eq!(entries[0].status, EvaluationState::UnderEvaluation);
    }

    // --- Status aggregation ---

    #[test]
    fn status_defaults_to_not_evaluated_at_creation_time() {
        let r = repo("fresh");
        let challenge_id = r.challenge_id;
        let statuses = compute_status(challenge_id, std::slice::from_ref(&r), &[]);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].state, EvaluationState::NotEvaluated);
        assert_eq!(statuses[0].last_updated, r.created_at);
    }

    #[test]
    fn status_sorted_case_insensitively_and_overridden_by_evaluations() {
        let banana = repo("banana");
        let apple = repo("Apple");
        let challenge_id = apple.challenge_id;
        let evaluations = vec![evaluation(
            banana.id,
            None,
            EvaluationState::UnderEvaluation,
        )];

        let statuses = compute_status(
            challenge_id,
            &[banana.clone(), apple.clone()],
            &evaluations,
        );

        assert_eq!(statuses[0].repository_id, apple.id);
        assert_eq!(statuses[1].repository_id, banana.id);
        assert_eq!(statuses[1].state, EvaluationState::UnderEvaluation);
    }

    #[test]
    fn status_ignores_records_for_unknown_repositories() {
        let r = repo("known");
        let stray = evaluation(Uuid::new_v4(), Some(1.0), EvaluationState::Evaluated);
        let statuses = compute_status(r.challenge_id, std::slice::from_ref(&r), &[stray]);
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].state, EvaluationState::NotEvaluated);
    }
}
