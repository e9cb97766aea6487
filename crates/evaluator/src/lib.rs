//! Evaluation engine for the CodeJudge platform.
//!
//! Drives AI-agent evaluations of candidate repositories:
//!
//! - [`agent`] — HTTP client trait for the evaluation agent and lenient
//!   parsing of its verdicts.
//! - [`github`] — repository snapshot fetching via the GitHub REST API.
//! - [`service`] — [`EvaluationService`], the per-challenge orchestration
//!   across every (repository, criterion) pair.
//! - [`scheduler`] — background loop re-evaluating active challenges on a
//!   fixed interval.

pub mod agent;
pub mod github;
pub mod scheduler;
pub mod service;

pub use agent::{AgentClient, AgentConfig, AgentError, HttpAgentClient};
pub use scheduler::EvaluationScheduler;
pub use service::{EvaluationService, ServiceError};
