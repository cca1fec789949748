//! Domain errors for SonarQube evidence resolution.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Remote endpoint an HTTP failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/api/ce/task`
    TaskStatus,
    /// `/api/qualitygates/project_status`
    QualityGates,
    /// `api.<host>/dop-translation/jfrog-evidence/<task>`
    Enterprise,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TaskStatus => "task",
            Self::QualityGates => "quality gates",
            Self::Enterprise => "enterprise",
        };
        f.write_str(name)
    }
}

/// Errors produced while resolving SonarQube evidence.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// No task id in the report, or an empty id was passed
    #[error("ceTaskID is required for SonarQube evidence creation")]
    MissingTaskId,

    /// Neither the configured path nor any conventional location exists
    #[error("no report-task.txt file found and no custom path configured")]
    ReportNotFound,

    #[error("failed to read report task file '{}': {source}", path.display())]
    /// The report file exists but could not be read
    ReportRead {
        /// File that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    #[error("{endpoint} endpoint returned status {status}: {body}")]
    /// Non-200 response
    Http {
        /// Endpoint that answered
        endpoint: Endpoint,
        /// HTTP status code
        status: u16,
        /// Response body, lossily decoded
        body: String,
    },

    #[error("{endpoint} endpoint request failed: {message}")]
    /// No response: connection, TLS or body read failure
    Transport {
        /// Endpoint being called
        endpoint: Endpoint,
        /// Underlying error text
        message: String,
    },

    #[error("failed to parse {endpoint} response: {message}")]
    /// 200 response whose body does not match the expected shape
    Decode {
        /// Endpoint that answered
        endpoint: Endpoint,
        /// Parser error text
        message: String,
    },

    #[error("timed out after {timeout:?} waiting for SonarQube task {task_id} to complete")]
    /// The task stayed non-terminal for the whole polling budget
    PollingTimeout {
        /// Task being polled
        task_id: String,
        /// Budget that was exhausted
        timeout: Duration,
    },

    #[error("SonarQube task {task_id} failed with status: {status}")]
    /// The task ended as `FAILED` or `CANCELED`
    TaskFailed {
        /// Task that failed
        task_id: String,
        /// Terminal status
        status: String,
    },

    #[error("polling of SonarQube task {task_id} was cancelled")]
    /// Polling was aborted through the cancellation token
    Cancelled {
        /// Task being polled
        task_id: String,
    },

    #[error(
        "missing entitlement for evidence creation: the SonarQube evidence integration \
         is not available for this plan or configuration (enterprise endpoint returned status {status})"
    )]
    /// The enterprise endpoint refused with 403 or 404
    EntitlementMissing {
        /// Status the endpoint returned
        status: u16,
    },

    /// Invalid client setup
    #[error("configuration error: {0}")]
    Config(String),

    /// Predicate could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result alias for evidence resolution.
pub type EvidenceResult<T> = Result<T, EvidenceError>;

impl EvidenceError {
    /// Build an HTTP error from a non-success response.
    pub fn from_status(endpoint: Endpoint, status: reqwest::StatusCode, body: String) -> Self {
        Self::Http {
            endpoint,
            status: status.as_u16(),
            body,
        }
    }

    /// Plan or configuration does not grant the direct statement capability.
    pub fn is_entitlement(&self) -> bool {
        matches!(self, Self::EntitlementMissing { .. })
    }

    /// Polling budget exhausted.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::PollingTimeout { .. })
    }

    /// The remote job finished but did not succeed.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::TaskFailed { .. })
    }

    /// Local input problems detected before any remote call.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingTaskId | Self::ReportNotFound | Self::ReportRead { .. }
        )
    }

    /// HTTP status attached to the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } | Self::EntitlementMissing { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for EvidenceError {
    fn from(err: serde_json::Error) -> Self {
        EvidenceError::Serialization(err.to_string())
    }
}
