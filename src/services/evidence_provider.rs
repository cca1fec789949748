//! SonarQube evidence provider.
//!
//! Produces either the enterprise in-toto statement or, as a fallback, a
//! predicate assembled from quality gate data. One provider serves one
//! resolution attempt: the analysis id found by polling is cached on the
//! instance and reused by later calls.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::errors::{EvidenceError, EvidenceResult};
use crate::domain::models::{PollingConfig, PredicateEvidence, SonarPredicate, SONAR_PREDICATE_TYPE};
use crate::domain::ports::SonarClient;
use crate::infrastructure::sonar::SonarHttpClient;

use super::error_classifier::classify_statement_error;
use super::task_poller::poll_until_terminal;

/// Produces evidence for one resolution attempt.
pub struct EvidenceProvider {
    client: Arc<dyn SonarClient>,
    cancellation: CancellationToken,
    cached_analysis_id: Option<String>,
}

impl EvidenceProvider {
    /// Provider over any [`SonarClient`].
    pub fn new(client: Arc<dyn SonarClient>) -> Self {
        Self {
            client,
            cancellation: CancellationToken::new(),
            cached_analysis_id: None,
        }
    }

    /// Provider backed by the HTTP client.
    pub fn with_credentials(sonar_url: &str, token: Option<String>) -> EvidenceResult<Self> {
        if sonar_url.is_empty() {
            return Err(EvidenceError::Config("SonarQube URL is required".to_string()));
        }
        let client = SonarHttpClient::new(sonar_url, token)?;
        Ok(Self::new(Arc::new(client)))
    }

    /// Abort polling when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Analysis id found by an earlier poll, if any.
    pub fn cached_analysis_id(&self) -> Option<&str> {
        self.cached_analysis_id.as_deref()
    }

    /// Fetch the enterprise in-toto statement for `ce_task_id`.
    ///
    /// The endpoint is tried once right away. If that fails, the task is
    /// polled to completion (unless an analysis id is already cached) and the
    /// endpoint is tried exactly once more. Only the final failure is
    /// classified.
    pub async fn get_statement(
        &mut self,
        ce_task_id: &str,
        polling: PollingConfig,
    ) -> EvidenceResult<Vec<u8>> {
        if ce_task_id.is_empty() {
            return Err(EvidenceError::MissingTaskId);
        }

        match self.client.get_intoto_statement(ce_task_id).await {
            Ok(statement) => {
                debug!(task_id = ce_task_id, "statement available without polling");
                return Ok(statement);
            }
            Err(err) => {
                debug!(task_id = ce_task_id, error = %err, "statement not yet available");
            }
        }

        self.ensure_analysis_id(ce_task_id, polling).await?;

        self.client
            .get_intoto_statement(ce_task_id)
            .await
            .map_err(classify_statement_error)
    }

    /// Build the quality gate predicate for `ce_task_id`.
    pub async fn build_predicate(
        &mut self,
        ce_task_id: &str,
        polling: PollingConfig,
    ) -> EvidenceResult<PredicateEvidence> {
        if ce_task_id.is_empty() {
            return Err(EvidenceError::MissingTaskId);
        }

        let analysis_id = self.ensure_analysis_id(ce_task_id, polling).await?;
        let analysis = self.client.get_quality_gate_analysis(&analysis_id).await?;
        let predicate = serde_json::to_vec(&SonarPredicate::from(&analysis))?;

        Ok(PredicateEvidence {
            predicate_type: SONAR_PREDICATE_TYPE.to_string(),
            predicate,
        })
    }

    async fn ensure_analysis_id(
        &mut self,
        ce_task_id: &str,
        polling: PollingConfig,
    ) -> EvidenceResult<String> {
        if let Some(analysis_id) = &self.cached_analysis_id {
            return Ok(analysis_id.clone());
        }

        info!(
            task_id = ce_task_id,
            max_retries = polling.max_retries,
            retry_interval_ms = polling.retry_interval_ms,
            "polling for task completion"
        );
        let analysis_id =
            poll_until_terminal(self.client.as_ref(), ce_task_id, polling, &self.cancellation)
                .await?;
        self.cached_analysis_id = Some(analysis_id.clone());
        Ok(analysis_id)
    }
}
