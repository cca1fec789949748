//! End-to-end resolution of SonarQube evidence.
//!
//! Locates and parses the report, resolves the server URL, builds a client
//! and hands off to an [`EvidenceProvider`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::domain::errors::{EvidenceError, EvidenceResult};
use crate::domain::models::{PollingConfig, PredicateEvidence, ReportTask, SonarConfig};
use crate::domain::ports::SonarClient;
use crate::infrastructure::credentials::sonar_token_from_env;
use crate::infrastructure::sonar::SonarHttpClient;

use super::base_url::resolve_base_url;
use super::evidence_provider::EvidenceProvider;
use super::report_locator::locate_report_task;
use super::report_parser::parse_report_task;

/// Builds a client for a resolved base URL and optional token.
pub type ClientFactory =
    Arc<dyn Fn(&str, Option<String>) -> EvidenceResult<Arc<dyn SonarClient>> + Send + Sync>;

/// Payload handed to the evidence recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEvidence {
    /// Ready-made in-toto statement from the enterprise endpoint
    Statement(Vec<u8>),
    /// Locally assembled quality gate predicate
    Predicate(PredicateEvidence),
}

/// Entry point: from a project directory to evidence bytes.
pub struct StatementResolver {
    config: SonarConfig,
    working_dir: PathBuf,
    token: Option<String>,
    cancellation: CancellationToken,
    client_factory: ClientFactory,
}

impl fmt::Debug for StatementResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementResolver")
            .field("config", &self.config)
            .field("working_dir", &self.working_dir)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

/// A located report plus a fresh provider for it.
struct Resolution {
    report: ReportTask,
    provider: EvidenceProvider,
    polling: PollingConfig,
}

impl StatementResolver {
    /// Resolver for the current directory using the token from the environment.
    pub fn new(config: SonarConfig) -> Self {
        Self {
            config,
            working_dir: PathBuf::from("."),
            token: sonar_token_from_env(),
            cancellation: CancellationToken::new(),
            client_factory: Arc::new(|url: &str, token: Option<String>| {
                let client: Arc<dyn SonarClient> = Arc::new(SonarHttpClient::new(url, token)?);
                Ok(client)
            }),
        }
    }

    /// Directory the report search starts from.
    #[must_use]
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Token for the SonarQube API; empty means anonymous.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Abort polling when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Replace how the SonarQube client is built.
    #[must_use]
    pub fn with_client_factory(mut self, factory: ClientFactory) -> Self {
        self.client_factory = factory;
        self
    }

    /// Resolve the enterprise in-toto statement.
    pub async fn resolve_statement(&self) -> EvidenceResult<Vec<u8>> {
        info!("Fetching SonarQube in-toto statement");
        let mut resolution = self.prepare()?;
        resolution
            .provider
            .get_statement(&resolution.report.ce_task_id, resolution.polling)
            .await
    }

    /// Resolve the quality gate predicate.
    pub async fn resolve_predicate(&self) -> EvidenceResult<PredicateEvidence> {
        info!("Building SonarQube quality gate predicate");
        let mut resolution = self.prepare()?;
        resolution
            .provider
            .build_predicate(&resolution.report.ce_task_id, resolution.polling)
            .await
    }

    /// Resolve the statement, falling back to the predicate when the
    /// enterprise endpoint is not entitled. The fallback reuses the same
    /// provider, so the task is not polled twice.
    pub async fn resolve_evidence(&self) -> EvidenceResult<ResolvedEvidence> {
        let mut resolution = self.prepare()?;
        let task_id = resolution.report.ce_task_id.clone();

        match resolution
            .provider
            .get_statement(&task_id, resolution.polling)
            .await
        {
            Ok(statement) => Ok(ResolvedEvidence::Statement(statement)),
            Err(err) if err.is_entitlement() => {
                warn!(task_id = %task_id, error = %err, "falling back to quality gate predicate");
                resolution
                    .provider
                    .build_predicate(&task_id, resolution.polling)
                    .await
                    .map(ResolvedEvidence::Predicate)
            }
            Err(err) => Err(err),
        }
    }

    fn prepare(&self) -> EvidenceResult<Resolution> {
        let report_path = locate_report_task(&self.working_dir, self.config.report_task_file())
            .ok_or(EvidenceError::ReportNotFound)?;
        let report = parse_report_task(&report_path)?;
        info!(
            path = %report_path.display(),
            task_id = %report.ce_task_id,
            project_key = report.project_key.as_deref().unwrap_or_default(),
            "parsed report-task file"
        );

        let base_url = resolve_base_url(
            report.ce_task_url.as_deref(),
            report.server_url.as_deref(),
            self.config.url_override(),
        );
        info!(%base_url, authenticated = self.token.is_some(), "resolved SonarQube server");

        let client = (self.client_factory)(&base_url, self.token.clone())?;
        let provider = EvidenceProvider::new(client).with_cancellation(self.cancellation.clone());

        Ok(Resolution {
            report,
            provider,
            polling: self.config.polling(),
        })
    }
}
