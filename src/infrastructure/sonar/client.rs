//! SonarQube HTTP client.
//!
//! Wraps the three read-only endpoints the evidence engine needs. Every
//! response body is fully consumed before returning so the connection goes
//! back to the pool on both success and failure paths.

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use tracing::debug;
use url::{form_urlencoded, Host, Url};

use crate::domain::errors::{Endpoint, EvidenceError, EvidenceResult};
use crate::domain::models::{QualityGatesAnalysis, TaskDetails};
use crate::domain::ports::SonarClient;

const TASK_PATH: &str = "/api/ce/task";
const QUALITY_GATES_PATH: &str = "/api/qualitygates/project_status";
const EVIDENCE_PATH: &str = "/dop-translation/jfrog-evidence";

/// reqwest-backed [`SonarClient`].
#[derive(Debug, Clone)]
pub struct SonarHttpClient {
    http: Client,
    /// Server origin without a trailing slash.
    base_url: String,
    token: Option<String>,
}

impl SonarHttpClient {
    /// Create a client for `base_url`. An empty token means anonymous access.
    pub fn new(base_url: &str, token: Option<String>) -> EvidenceResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("sonar-evidence/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| EvidenceError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Server origin requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue an authenticated GET and return the raw body of a 200 response.
    async fn get(
        &self,
        endpoint: Endpoint,
        url: &str,
        query: &[(&str, &str)],
    ) -> EvidenceResult<Vec<u8>> {
        let mut request = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json");
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        debug!(%endpoint, url, ?query, "HTTP GET");
        let response = request.send().await.map_err(|e| {
            debug!(%endpoint, url, error = %e, "HTTP GET error");
            EvidenceError::Transport {
                endpoint,
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| EvidenceError::Transport {
                endpoint,
                message: format!("failed to read response body: {e}"),
            })?;
        debug!(
            %endpoint,
            url,
            status = status.as_u16(),
            body = %String::from_utf8_lossy(&body),
            "HTTP GET response"
        );

        if status != StatusCode::OK {
            return Err(EvidenceError::from_status(
                endpoint,
                status,
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }
        Ok(body.to_vec())
    }
}

#[async_trait]
impl SonarClient for SonarHttpClient {
    async fn get_task_details(&self, ce_task_id: &str) -> EvidenceResult<Option<TaskDetails>> {
        if ce_task_id.is_empty() {
            return Ok(None);
        }
        let url = format!("{}{TASK_PATH}", self.base_url);
        let body = self
            .get(Endpoint::TaskStatus, &url, &[("id", ce_task_id)])
            .await?;
        let details = serde_json::from_slice(&body).map_err(|e| EvidenceError::Decode {
            endpoint: Endpoint::TaskStatus,
            message: e.to_string(),
        })?;
        Ok(Some(details))
    }

    async fn get_quality_gate_analysis(
        &self,
        analysis_id: &str,
    ) -> EvidenceResult<QualityGatesAnalysis> {
        if analysis_id.is_empty() {
            return Err(EvidenceError::Config(
                "missing analysis id for quality gates endpoint".to_string(),
            ));
        }
        let url = format!("{}{QUALITY_GATES_PATH}", self.base_url);
        let body = self
            .get(Endpoint::QualityGates, &url, &[("analysisId", analysis_id)])
            .await?;
        serde_json::from_slice(&body).map_err(|e| EvidenceError::Decode {
            endpoint: Endpoint::QualityGates,
            message: e.to_string(),
        })
    }

    async fn get_intoto_statement(&self, ce_task_id: &str) -> EvidenceResult<Vec<u8>> {
        if ce_task_id.is_empty() {
            return Err(EvidenceError::MissingTaskId);
        }
        let encoded: String = form_urlencoded::byte_serialize(ce_task_id.as_bytes()).collect();
        let url = format!(
            "{}{EVIDENCE_PATH}/{encoded}",
            enterprise_base_url(&self.base_url)
        );
        self.get(Endpoint::Enterprise, &url, &[]).await
    }
}

/// Base URL of the enterprise integration API.
///
/// The integration lives on an `api.` subdomain of the server. Localhost,
/// IP literals and hosts already starting with `api.` are used as-is.
pub fn enterprise_base_url(base_url: &str) -> String {
    let needs_prefix = match Url::parse(base_url) {
        Ok(url) => match url.host() {
            Some(Host::Domain(host)) => host != "localhost" && !host.starts_with("api."),
            Some(Host::Ipv4(_) | Host::Ipv6(_)) | None => false,
        },
        Err(_) => false,
    };

    if needs_prefix {
        base_url.replacen("://", "://api.", 1)
    } else {
        base_url.to_string()
    }
}
