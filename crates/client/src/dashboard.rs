//! Ranking dashboard state.
//!
//! Tracks the selected challenge, its current rank entries, and an optional
//! per-repository detail view. Rank refreshes are expected to arrive out of
//! order relative to challenge switches, so every selection bumps a
//! generation counter and responses carrying a stale generation are dropped
//! on the floor instead of overwriting the current challenge's entries.

use std::time::Duration;

use codejudge_core::model::{Challenge, EvaluationDetail, RankEntry, RankResponse};
use codejudge_core::types::EntityId;

use crate::api::{ApiClient, ClientError};

/// How often the rank view refreshes while a challenge is selected.
pub const RANK_POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// The repository detail panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    #[default]
    Closed,
    /// History fetch in flight.
    Loading { repository_id: EntityId },
    Loaded {
        repository_id: EntityId,
        history: Vec<EvaluationDetail>,
    },
}

/// State backing the ranking dashboard.
pub struct Dashboard {
    client: ApiClient,
    pub challenges: Vec<Challenge>,
    selected: Option<EntityId>,
    generation: u64,
    pub entries: Vec<RankEntry>,
    pub detail: DetailState,
}

impl Dashboard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            challenges: Vec::new(),
            selected: None,
            generation: 0,
            entries: Vec::new(),
            detail: DetailState::Closed,
        }
    }

    pub fn selected_challenge(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load the challenge list, then select `preferred` when it exists or
    /// the first challenge otherwise.
    pub async fn load_challenges(
        &mut self,
        preferred: Option<EntityId>,
    ) -> Result<(), ClientError> {
        self.challenges = self.client.list_challenges().await?;
        let target = preferred
            .filter(|id| self.challenges.iter().any(|c| c.id == *id))
            .or_else(|| self.challenges.first().map(|c| c.id));
        if let Some(id) = target {
            self.select_challenge(id);
        }
        Ok(())
    }

    /// Switch to another challenge. Clears the rank entries and the detail
    /// panel, and bumps the generation so in-flight rank responses for the
    /// previous challenge are discarded on arrival.
    pub fn select_challenge(&mut self, challenge_id: EntityId) {
        self.selected = Some(challenge_id);
        self.generation += 1;
        self.entries.clear();
        self.detail = DetailState::Closed;
    }

    /// Fetch the current ranking and apply it, unless the selection changed
    /// while the request was in flight.
    pub async fn refresh_rank(&mut self) -> Result<(), ClientError> {
        let Some(challenge_id) = self.selected else {
            return Ok(());
        };
        let generation = self.generation;
        let response = self.client.rank(challenge_id).await?;
        if !self.apply_rank(generation, response) {
            tracing::debug!(%challenge_id, "Discarded stale rank response");
        }
        Ok(())
    }

    /// Apply a rank response fetched under `generation`. Returns false (and
    /// leaves state untouched) when the generation is stale.
    pub fn apply_rank(&mut self, generation: u64, response: RankResponse) -> bool {
        if generation != self.generation {
            return false;
        }
        self.entries = response.entries;
        true
    }

    /// Open the detail panel for a repository and fetch its history.
    pub async fn open_detail(&mut self, repository_id: EntityId) -> Result<(), ClientError> {
        let Some(challenge_id) = self.selected else {
            return Ok(());
        };
        self.detail = DetailState::Loading { repository_id };
        let history = self
            .client
            .evaluation_history(challenge_id, repository_id)
            .await?;
        // The panel may have been closed or retargeted while loading.
        if self.detail == (DetailState::Loading { repository_id }) {
            self.detail = DetailState::Loaded {
                repository_id,
                history: history.evaluations,
            };
        }
        Ok(())
    }

    pub fn close_detail(&mut self) {
        self.detail = DetailState::Closed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn entry(name: &str, score: Option<f64>) -> RankEntry {
        RankEntry {
            repository_id: Uuid::new_v4(),
            repository_name: name.to_string(),
            repository_url: format!("https://github.com/acme/{name}"),
            unscored: score.is_none(),
            total_score: score,
            status: Default::default(),
        }
    }

    fn response(challenge_id: EntityId, entries: Vec<RankEntry>) -> RankResponse {
        RankResponse {
            challenge_id,
            entries,
            generated_at: Utc::now(),
        }
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(ApiClient::new("http://127.0.0.1:0"))
    }

    #[test]
    fn rank_response_for_current_generation_applies() {
        let mut dash = dashboard();
        let challenge = Uuid::new_v4();
        dash.select_challenge(challenge);

        let generation = dash.generation();
        assert!(dash.apply_rank(generation, response(challenge, vec![entry("a", Some(8.0))])));
        assert_eq!(dash.entries.len(), 1);
    }

    #[test]
    fn stale_rank_response_is_discarded() {
        let mut dash = dashboard();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        dash.select_challenge(first);
        let stale_generation = dash.generation();

        // A response for `first` is still in flight when the user switches.
        dash.select_challenge(second);
        let fresh_generation = dash.generation();
        assert!(dash.apply_rank(
            fresh_generation,
            response(second, vec![entry("current", Some(9.0))])
        ));

        assert!(!dash.apply_rank(
            stale_generation,
            response(first, vec![entry("stale", Some(1.0))])
        ));
        assert_eq!(dash.entries.len(), 1);
        assert_eq!(dash.entries[0].repository_name, "current");
    }

    #[test]
    fn selecting_a_challenge_clears_entries_and_detail() {
        let mut dash = dashboard();
        let challenge = Uuid::new_v4();
        dash.select_challenge(challenge);
        let generation = dash.generation();
        dash.apply_rank(generation, response(challenge, vec![entry("a", None)]));
        dash.detail = DetailState::Loading {
            repository_id: Uuid::new_v4(),
        };

        dash.select_challenge(Uuid::new_v4());
        assert!(dash.entries.is_empty());
        assert_eq!(dash.detail, DetailState::Closed);
    }
}
