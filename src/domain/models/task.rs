//! Compute Engine task model returned by `/api/ce/task`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Status of a SonarQube Compute Engine task.
///
/// Unknown values are kept verbatim and treated as non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Queued, not yet picked up
    #[default]
    Pending,
    /// Being processed by the Compute Engine
    InProgress,
    /// Analysis stored; `analysisId` is set
    Success,
    /// Processing failed
    Failed,
    /// Cancelled before completion
    Canceled,
    /// Any status this crate does not know about
    Other(String),
}

impl TaskStatus {
    /// Wire representation, e.g. `IN_PROGRESS`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
            Self::Canceled => "CANCELED",
            Self::Other(s) => s,
        }
    }

    /// No further transition will happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed | Self::Canceled)
    }

    /// The task finished and produced an analysis.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<String> for TaskStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PENDING" => Self::Pending,
            "IN_PROGRESS" => Self::InProgress,
            "SUCCESS" => Self::Success,
            "FAILED" => Self::Failed,
            "CANCELED" => Self::Canceled,
            _ => Self::Other(s),
        }
    }
}

impl From<&str> for TaskStatus {
    fn from(s: &str) -> Self {
        Self::from(s.to_string())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `GET /api/ce/task?id=<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDetails {
    /// The task record
    pub task: Task,
}

/// A Compute Engine task. Only `status` and `analysis_id` drive resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Task {
    /// Compute Engine task id
    pub id: String,
    /// Task type, usually `REPORT`
    #[serde(rename = "type")]
    pub task_type: String,
    /// Project key the analysis belongs to
    pub component_key: String,
    /// Human-readable project name
    pub component_name: String,
    /// Analysis id, empty until the task succeeds
    pub analysis_id: String,
    /// Current task status
    pub status: TaskStatus,
    /// Submission timestamp as sent by the server
    pub submitted_at: String,
    /// Processing start timestamp
    pub started_at: String,
    /// Processing end timestamp
    pub executed_at: String,
    /// Processing duration in milliseconds
    pub execution_time_ms: u64,
    /// SonarCloud organization, empty on SonarQube
    pub organization: String,
}

impl TaskDetails {
    /// Convenience constructor used by clients and tests.
    pub fn with_status(status: impl Into<TaskStatus>, analysis_id: &str) -> Self {
        Self {
            task: Task {
                status: status.into(),
                analysis_id: analysis_id.to_string(),
                ..Task::default()
            },
        }
    }
}
