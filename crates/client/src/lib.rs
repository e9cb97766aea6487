//! Client library for the CodeJudge platform.
//!
//! - [`api`] — typed HTTP client, one method per endpoint.
//! - [`poll`] — cancellable fixed-interval poller driving dashboard refreshes.
//! - [`form`] — the challenge/criteria draft form state machine.
//! - [`dashboard`] — ranking dashboard state, including stale-response
//!   protection across challenge switches.

pub mod api;
pub mod dashboard;
pub mod form;
pub mod poll;

pub use api::{ApiClient, ClientError};
pub use dashboard::{Dashboard, DetailState, RANK_POLL_INTERVAL};
pub use form::{ChallengeConsole, ChallengeForm, CriterionDraft, DraftId, DraftOrigin, FormUi};
pub use poll::Poller;
