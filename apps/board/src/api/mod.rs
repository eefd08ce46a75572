//! Workflow API client — the single point of entry for all board HTTP calls.
//!
//! ARCHITECTURAL RULE: no other module issues network requests for stages,
//! rosters, moves or notes. Rendering code never talks to the server
//! directly; it goes through the board, which goes through this trait.
//!
//! There is deliberately no retry/backoff here: a failed load or commit is
//! surfaced and retried only by explicit user action.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::{CandidateSummary, Note, Stage};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The workflow backend as the board sees it.
///
/// Held as `Arc<dyn WorkflowApi>` so the transport can be swapped without
/// touching the projection or the move coordinator; tests substitute a
/// recording double.
#[async_trait]
pub trait WorkflowApi: Send + Sync {
    /// All stages configured for the organization.
    async fn list_stages(&self, organization_id: &str) -> Result<Vec<Stage>, ApiError>;

    /// Candidates currently assigned to one stage, optionally filtered by a
    /// search term.
    async fn list_candidates(
        &self,
        stage_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<CandidateSummary>, ApiError>;

    /// Commits a stage transition. The server is free to apply side effects
    /// beyond the single field changed here, which is why the board never
    /// trusts its optimistic state after a successful commit.
    async fn move_candidate(&self, candidate_id: &str, dest_stage_id: &str)
        -> Result<(), ApiError>;
}

/// The independent notes service used by the detail overlay. Writes through
/// here never touch the board projection.
#[async_trait]
pub trait NotesApi: Send + Sync {
    async fn list_notes(&self, candidate_id: &str) -> Result<Vec<Note>, ApiError>;

    async fn add_note(&self, note: &Note) -> Result<(), ApiError>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MoveRequest<'a> {
    stage_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// reqwest-backed implementation of both service traits.
#[derive(Clone)]
pub struct HttpWorkflowApi {
    client: Client,
    base_url: String,
}

impl HttpWorkflowApi {
    pub fn from_config(config: &crate::config::BoardConfig) -> Self {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into();
        HttpWorkflowApi {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Converts a non-success response into an `ApiError`, pulling the message
/// out of the standard `{"error": {"code", "message"}}` envelope when the
/// body carries one.
async fn read_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    ApiError::Api { status, message }
}

#[async_trait]
impl WorkflowApi for HttpWorkflowApi {
    async fn list_stages(&self, organization_id: &str) -> Result<Vec<Stage>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/organizations/{organization_id}/stages")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let stages: Vec<Stage> = response.json().await?;
        debug!(organization_id, count = stages.len(), "stage directory fetched");
        Ok(stages)
    }

    async fn list_candidates(
        &self,
        stage_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<CandidateSummary>, ApiError> {
        let mut request = self
            .client
            .get(self.url(&format!("/api/v1/stages/{stage_id}/candidates")));
        if let Some(term) = search {
            request = request.query(&[("search", term)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        let candidates: Vec<CandidateSummary> = response.json().await?;
        debug!(stage_id, count = candidates.len(), "stage roster fetched");
        Ok(candidates)
    }

    async fn move_candidate(
        &self,
        candidate_id: &str,
        dest_stage_id: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .client
            .put(self.url(&format!("/api/v1/candidates/{candidate_id}/stage")))
            .json(&MoveRequest {
                stage_id: dest_stage_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        debug!(candidate_id, dest_stage_id, "stage transition committed");
        Ok(())
    }
}

#[async_trait]
impl NotesApi for HttpWorkflowApi {
    async fn list_notes(&self, candidate_id: &str) -> Result<Vec<Note>, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/v1/candidates/{candidate_id}/notes")))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        Ok(response.json().await?)
    }

    async fn add_note(&self, note: &Note) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(&format!("/api/v1/candidates/{}/notes", note.candidate_id)))
            .json(note)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(read_error(response).await);
        }

        Ok(())
    }
}
