//! Challenge creation form: modal-in-modal draft editing.
//!
//! The challenge modal holds the challenge fields plus a list of draft
//! criteria. Each draft can be opened in its own editor; when the editor is
//! opened from inside the challenge modal, the modal is hidden and restored
//! once the editor closes. Drafts are addressed by a stable synthetic id so
//! edits and deletes survive reordering of the list.
//!
//! Nothing here is persisted: drafts only reach the server as part of the
//! challenge create payload.

use codejudge_core::model::{Challenge, CreateChallenge, CriterionPayload};

use crate::api::{ApiClient, ClientError};

/// Synthetic identifier for an unpersisted criterion draft.
pub type DraftId = u64;

/// An in-progress criterion, not yet persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CriterionDraft {
    pub name: String,
    pub description: String,
    pub score_multiplier: f64,
    pub code_concept: String,
}

/// Where the draft editor was opened from. Only an editor opened from the
/// challenge modal restores that modal on close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftOrigin {
    Standalone,
    FromChallengeModal,
}

/// Which surface of the form is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormUi {
    /// Everything closed.
    #[default]
    Closed,
    /// The challenge modal is visible.
    ChallengeOpen,
    /// The draft editor is visible. `target` is the draft being edited, or
    /// `None` for a new draft.
    DraftOpen {
        target: Option<DraftId>,
        origin: DraftOrigin,
    },
}

/// State backing the challenge creation form.
#[derive(Debug, Default)]
pub struct ChallengeForm {
    pub name: String,
    pub description: String,
    pub expected_outcome: String,
    drafts: Vec<(DraftId, CriterionDraft)>,
    next_draft_id: DraftId,
    ui: FormUi,
}

impl ChallengeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ui(&self) -> FormUi {
        self.ui
    }

    pub fn drafts(&self) -> &[(DraftId, CriterionDraft)] {
        &self.drafts
    }

    pub fn draft(&self, id: DraftId) -> Option<&CriterionDraft> {
        self.drafts.iter().find(|(d, _)| *d == id).map(|(_, c)| c)
    }

    /// Whether the challenge modal is currently visible. It is hidden while
    /// a draft editor opened from it is showing.
    pub fn challenge_modal_visible(&self) -> bool {
        self.ui == FormUi::ChallengeOpen
    }

    pub fn open_challenge_modal(&mut self) {
        self.ui = FormUi::ChallengeOpen;
    }

    pub fn close_challenge_modal(&mut self) {
        if self.ui == FormUi::ChallengeOpen {
            self.ui = FormUi::Closed;
        }
    }

    /// Open the draft editor for a new draft (`target = None`) or an
    /// existing one. Opening from inside the challenge modal suspends it.
    pub fn open_draft(&mut self, target: Option<DraftId>) {
        let origin = if self.ui == FormUi::ChallengeOpen {
            DraftOrigin::FromChallengeModal
        } else {
            DraftOrigin::Standalone
        };
        self.ui = FormUi::DraftOpen { target, origin };
    }

    /// Save the edited draft: insert when new, replace by id when editing.
    /// Closes the editor and restores the suspended challenge modal.
    pub fn save_draft(&mut self, draft: CriterionDraft) {
        let FormUi::DraftOpen { target, origin } = self.ui else {
            return;
        };
        match target {
            Some(id) => {
                if let Some(slot) = self.drafts.iter_mut().find(|(d, _)| *d == id) {
                    slot.1 = draft;
                }
            }
            None => {
                let id = self.next_draft_id;
                self.next_draft_id += 1;
                self.drafts.push((id, draft));
            }
        }
        self.close_editor(origin);
    }

    /// Remove the draft under edit, then close the editor.
    pub fn delete_draft(&mut self) {
        let FormUi::DraftOpen { target, origin } = self.ui else {
            return;
        };
        if let Some(id) = target {
            self.drafts.retain(|(d, _)| *d != id);
        }
        self.close_editor(origin);
    }

    /// Close the editor without touching the draft list.
    pub fn cancel_draft(&mut self) {
        if let FormUi::DraftOpen { origin, .. } = self.ui {
            self.close_editor(origin);
        }
    }

    fn close_editor(&mut self, origin: DraftOrigin) {
        self.ui = match origin {
            DraftOrigin::FromChallengeModal => FormUi::ChallengeOpen,
            DraftOrigin::Standalone => FormUi::Closed,
        };
    }

    /// Build the create payload. Drafts whose name is blank are dropped.
    pub fn submit_payload(&self) -> CreateChallenge {
        CreateChallenge {
            name: self.name.trim().to_string(),
            description: self.description.clone(),
            expected_outcome: self.expected_outcome.clone(),
            active: true,
            criteria: self
                .drafts
                .iter()
                .filter(|(_, d)| !d.name.trim().is_empty())
                .map(|(_, d)| CriterionPayload {
                    name: d.name.clone(),
                    description: d.description.clone(),
                    score_multiplier: d.score_multiplier,
                    code_concept: d.code_concept.clone(),
                })
                .collect(),
        }
    }

    /// Clear all transient state back to a pristine closed form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// The challenge management console: the local challenge list plus the
/// creation form, wired to the API.
pub struct ChallengeConsole {
    client: ApiClient,
    pub challenges: Vec<Challenge>,
    pub form: ChallengeForm,
}

impl ChallengeConsole {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            challenges: Vec::new(),
            form: ChallengeForm::new(),
        }
    }

    pub async fn load_challenges(&mut self) -> Result<(), ClientError> {
        self.challenges = self.client.list_challenges().await?;
        Ok(())
    }

    /// Submit the form. On success the created challenge joins the local
    /// list and the form resets; on failure the form is left untouched so
    /// the user can correct and retry.
    pub async fn submit(&mut self) -> Result<(), ClientError> {
        let payload = self.form.submit_payload();
        let created = self.client.create_challenge(&payload).await?;
        tracing::info!(id = %created.id, name = %created.name, "Challenge created");
        self.challenges.push(created);
        self.form.reset();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_draft(name: &str) -> CriterionDraft {
        CriterionDraft {
            name: name.to_string(),
            description: "desc".to_string(),
            score_multiplier: 1.0,
            code_concept: "concept".to_string(),
        }
    }

    #[test]
    fn draft_from_challenge_modal_suspends_and_restores_it() {
        let mut form = ChallengeForm::new();
        form.open_challenge_modal();
        assert!(form.challenge_modal_visible());

        form.open_draft(None);
        assert!(!form.challenge_modal_visible());
        assert_eq!(
            form.ui(),
            FormUi::DraftOpen {
                target: None,
                origin: DraftOrigin::FromChallengeModal
            }
        );

        form.save_draft(named_draft("Error handling"));
        assert!(form.challenge_modal_visible());
        assert_eq!(form.drafts().len(), 1);
    }

    #[test]
    fn standalone_draft_editor_closes_without_opening_modal() {
        let mut form = ChallengeForm::new();
        form.open_draft(None);
        form.cancel_draft();
        assert_eq!(form.ui(), FormUi::Closed);
        assert!(form.drafts().is_empty());
    }

    #[test]
    fn draft_ids_are_stable_across_deletion() {
        let mut form = ChallengeForm::new();
        form.open_challenge_modal();

        for name in ["a", "b", "c"] {
            form.open_draft(None);
            form.save_draft(named_draft(name));
        }
        let ids: Vec<DraftId> = form.drafts().iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![0, 1, 2]);

        // Delete the middle draft; editing "c" by id still targets "c".
        form.open_draft(Some(ids[1]));
        form.delete_draft();
        form.open_draft(Some(ids[2]));
        form.save_draft(named_draft("c2"));

        let names: Vec<&str> = form
            .drafts()
            .iter()
            .map(|(_, d)| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "c2"]);
    }

    #[test]
    fn saving_replaces_existing_draft_by_id() {
        let mut form = ChallengeForm::new();
        form.open_draft(None);
        form.save_draft(named_draft("before"));
        let id = form.drafts()[0].0;

        form.open_draft(Some(id));
        form.save_draft(named_draft("after"));

        assert_eq!(form.drafts().len(), 1);
        assert_eq!(form.draft(id).unwrap().name, "after");
    }

    #[test]
    fn submit_payload_drops_blank_names() {
        let mut form = ChallengeForm::new();
        form.name = "Rust CLI challenge".to_string();
        form.open_draft(None);
        form.save_draft(named_draft("Keep me"));
        form.open_draft(None);
        form.save_draft(named_draft("   "));

        let payload = form.submit_payload();
        assert_eq!(payload.criteria.len(), 1);
        assert_eq!(payload.criteria[0].name, "Keep me");
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = ChallengeForm::new();
        form.name = "x".to_string();
        form.open_draft(None);
        form.save_draft(named_draft("y"));
        form.reset();

        assert_eq!(form.ui(), FormUi::Closed);
        assert!(form.drafts().is_empty());
        assert!(form.name.is_empty());
    }
}
