//! HTTP client for the evaluation agent.
//!
//! The agent is an opaque collaborator: it receives a JSON payload with one
//! criterion and a repository snapshot, and answers with a JSON verdict
//! `{"score", "reasoning", "suggestion"}`. Responses are parsed leniently —
//! agents are not reliable JSON emitters, so malformed fields decay to null
//! instead of failing the evaluation.

use async_trait::async_trait;

/// Agent connection settings, hydrated from the environment.
#[derive(Debug, Clone, Default)]
pub struct AgentConfig {
    /// Endpoint the verdict request is POSTed to (`AGENT_ENDPOINT`).
    pub endpoint: Option<String>,
    /// Optional model identifier forwarded with each request (`AGENT_MODEL`).
    pub model: Option<String>,
    /// Token for GitHub snapshot fetches (`GITHUB_TOKEN`).
    pub github_token: Option<String>,
}

impl AgentConfig {
    /// Load agent settings from environment variables. Missing variables
    /// leave the corresponding field unset; construction of the client
    /// decides whether that is fatal.
    pub fn from_env() -> Self {
        Self {
            endpoint: std::env::var("AGENT_ENDPOINT").ok(),
            model: std::env::var("AGENT_MODEL").ok(),
            github_token: std::env::var("GITHUB_TOKEN").ok(),
        }
    }
}

/// The agent's verdict for one (repository, criterion) pair.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationOutcome {
    pub score: Option<f64>,
    pub reasoning: Option<String>,
    pub suggestion: Option<String>,
}

/// Errors from the agent layer.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No agent endpoint is configured; evaluation cannot run.
    #[error("Agent endpoint is not configured (set AGENT_ENDPOINT)")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Agent request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The agent returned a non-2xx status code.
    #[error("Agent error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// A client able to obtain an evaluation verdict for a JSON payload.
///
/// Trait seam so the service can be exercised with a scripted agent in
/// tests.
#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn evaluate(&self, payload: &serde_json::Value) -> Result<EvaluationOutcome, AgentError>;
}

/// Production [`AgentClient`] talking to the configured HTTP endpoint.
pub struct HttpAgentClient {
    client: reqwest::Client,
    endpoint: String,
    model: Option<String>,
}

impl HttpAgentClient {
    /// Build a client from configuration. Fails immediately when no
    /// endpoint is configured — misconfiguration should surface at
    /// construction, not on the first evaluation.
    pub fn new(config: &AgentConfig) -> Result<Self, AgentError> {
        let endpoint = config.endpoint.clone().ok_or(AgentError::NotConfigured)?;
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    async fn evaluate(&self, payload: &serde_json::Value) -> Result<EvaluationOutcome, AgentError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": payload,
        });

        let response = self.client.post(&self.endpoint).json(&body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_outcome(&text))
    }
}

/// Parse an agent response body into an [`EvaluationOutcome`].
///
/// Accepts a numeric or numeric-string `score`; anything else becomes null.
/// `reasoning` and `suggestion` must be strings to be kept. A body that is
/// not valid JSON yields an empty outcome.
pub fn parse_outcome(raw: &str) -> EvaluationOutcome {
    let parsed: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(body = raw, "Agent response was not valid JSON");
            return EvaluationOutcome::default();
        }
    };

    let score = match &parsed["score"] {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };

    EvaluationOutcome {
        score,
        reasoning: parsed["reasoning"].as_str().map(str::to_string),
        suggestion: parsed["suggestion"].as_str().map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parse_outcome_reads_well_formed_verdict() {
        let outcome = parse_outcome(
            r#"{"score": 8.5, "reasoning": "solid error handling", "suggestion": "add tests"}"#,
        );
        assert_eq!(outcome.score, Some(8.5));
        assert_eq!(outcome.reasoning.as_deref(), Some("solid error handling"));
        assert_eq!(outcome.suggestion.as_deref(), Some("add tests"));
    }

    #[test]
    fn parse_outcome_accepts_string_score() {
        assert_eq!(parse_outcome(r#"{"score": "7"}"#).score, Some(7.0));
        assert_eq!(parse_outcome(r#"{"score": "high"}"#).score, None);
    }

    #[test]
    fn parse_outcome_tolerates_garbage() {
        assert_eq!(parse_outcome("not json at all"), EvaluationOutcome::default());
        let outcome = parse_outcome(r#"{"score": true, "reasoning": 42}"#);
        assert_eq!(outcome.score, None);
        assert_eq!(outcome.reasoning, None);
    }

    #[test]
    fn http_client_requires_endpoint() {
        let err = HttpAgentClient::new(&AgentConfig::default()).err().unwrap();
        assert_matches!(err, AgentError::NotConfigured);
    }
}
