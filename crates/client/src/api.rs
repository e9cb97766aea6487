//! HTTP client for the CodeJudge API.
//!
//! One method per endpoint, returning the shared wire models from
//! `codejudge_core::model`. Non-2xx responses surface as
//! [`ClientError::Api`] with the status and raw body, so callers can show
//! the server's localized error message as-is.

use reqwest::header::ACCEPT_LANGUAGE;
use serde::de::DeserializeOwned;
use serde::Serialize;

use codejudge_core::model::{
    Challenge, CreateChallenge, CreateCriterion, CreateRepository, Criterion, EvaluationHistory,
    EvaluationRequest, EvaluationStatus, RankResponse, Repository, TriggerAck, UpdateChallenge,
    UpdateCriterion,
};
use codejudge_core::types::EntityId;

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Errors from the API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
}

/// Client for the CodeJudge REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    locale: Option<String>,
}

impl ApiClient {
    /// Build a client against the given base URL (no trailing slash needed).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            locale: None,
        }
    }

    /// Build a client from `CODEJUDGE_API_URL`, defaulting to the local
    /// development server.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CODEJUDGE_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());
        Self::new(base_url)
    }

    /// Request server messages in the given locale via `Accept-Language`.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -- Challenges ---------------------------------------------------------

    pub async fn list_challenges(&self) -> Result<Vec<Challenge>, ClientError> {
        self.get("/challenges").await
    }

    pub async fn create_challenge(
        &self,
        input: &CreateChallenge,
    ) -> Result<Challenge, ClientError> {
        self.post("/challenges", input).await
    }

    pub async fn update_challenge(
        &self,
        id: EntityId,
        input: &UpdateChallenge,
    ) -> Result<Challenge, ClientError> {
        self.patch(&format!("/challenges/{id}"), input).await
    }

    pub async fn delete_challenge(&self, id: EntityId) -> Result<(), ClientError> {
        self.delete(&format!("/challenges/{id}")).await
    }

    // -- Criteria -----------------------------------------------------------

    pub async fn add_criterion(&self, input: &CreateCriterion) -> Result<Criterion, ClientError> {
        self.post("/criteria", input).await
    }

    pub async fn list_criteria(
        &self,
        challenge_id: EntityId,
    ) -> Result<Vec<Criterion>, ClientError> {
        self.get(&format!("/criteria/{challenge_id}")).await
    }

    pub async fn update_criterion(
        &self,
        id: EntityId,
        input: &UpdateCriterion,
    ) -> Result<Criterion, ClientError> {
        self.patch(&format!("/criteria/{id}"), input).await
    }

    // -- Repositories -------------------------------------------------------

    pub async fn add_repository(
        &self,
        input: &CreateRepository,
    ) -> Result<Repository, ClientError> {
        self.post("/repositories", input).await
    }

    pub async fn list_repositories(
        &self,
        challenge_id: EntityId,
    ) -> Result<Vec<Repository>, ClientError> {
        self.get(&format!("/repositories/challenges/{challenge_id}"))
            .await
    }

    pub async fn get_repository(
        &self,
        id: EntityId,
        challenge_id: EntityId,
    ) -> Result<Repository, ClientError> {
        self.get(&format!("/repositories/{id}?challenge_id={challenge_id}"))
            .await
    }

    pub async fn delete_repository(
        &self,
        id: EntityId,
        challenge_id: EntityId,
    ) -> Result<(), ClientError> {
        self.delete(&format!("/repositories/{id}?challenge_id={challenge_id}"))
            .await
    }

    // -- Evaluations --------------------------------------------------------

    pub async fn trigger_evaluation(
        &self,
        input: &EvaluationRequest,
    ) -> Result<TriggerAck, ClientError> {
        self.post("/evaluations/trigger", input).await
    }

    pub async fn evaluation_status(
        &self,
        challenge_id: EntityId,
    ) -> Result<Vec<EvaluationStatus>, ClientError> {
        self.get(&format!("/evaluations/status/{challenge_id}"))
            .await
    }

    pub async fn rank(&self, challenge_id: EntityId) -> Result<RankResponse, ClientError> {
        self.get(&format!("/evaluations/rank/{challenge_id}")).await
    }

    pub async fn evaluation_history(
        &self,
        challenge_id: EntityId,
        repository_id: EntityId,
    ) -> Result<EvaluationHistory, ClientError> {
        self.get(&format!(
            "/evaluations/repository/{challenge_id}/{repository_id}"
        ))
        .await
    }

    // -- Transport ----------------------------------------------------------

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(locale) = &self.locale {
            builder = builder.header(ACCEPT_LANGUAGE, locale);
        }
        builder
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.request(reqwest::Method::GET, path).send().await?;
        Self::decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .request(reqwest::Method::POST, path)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn patch<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let response = self
            .request(reqwest::Method::PATCH, path)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let response = self.request(reqwest::Method::DELETE, path).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response.json().await?)
    }
}
