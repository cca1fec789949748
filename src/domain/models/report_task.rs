//! Parsed `report-task.txt` descriptor.

use std::collections::HashMap;

/// Marker preceding the task id in a `ceTaskUrl`.
const TASK_ID_MARKER: &str = "?id=";

/// Descriptor written by a scanner after submitting an analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportTask {
    /// `ceTaskUrl`: status URL of the submitted task
    pub ce_task_url: Option<String>,
    /// Empty when neither `ceTaskId` nor a usable `ceTaskUrl` is present.
    pub ce_task_id: String,
    /// `projectKey`
    pub project_key: Option<String>,
    /// `serverUrl`: server the scanner submitted to
    pub server_url: Option<String>,
    /// Every `key=value` pair from the file, including unknown keys.
    pub properties: HashMap<String, String>,
}

impl ReportTask {
    /// Build the typed record from a property map.
    pub fn from_properties(properties: HashMap<String, String>) -> Self {
        let get = |key: &str| {
            properties
                .get(key)
                .filter(|v| !v.is_empty())
                .cloned()
        };

        let ce_task_url = get("ceTaskUrl");
        let ce_task_id = get("ceTaskId")
            .or_else(|| ce_task_url.as_deref().and_then(task_id_from_url))
            .unwrap_or_default();

        Self {
            project_key: get("projectKey"),
            server_url: get("serverUrl"),
            ce_task_url,
            ce_task_id,
            properties,
        }
    }

    /// A task id was found or derived.
    pub fn has_task_id(&self) -> bool {
        !self.ce_task_id.is_empty()
    }
}

/// Text after the last `?id=` in a task URL.
pub fn task_id_from_url(url: &str) -> Option<String> {
    url.rfind(TASK_ID_MARKER)
        .map(|idx| url[idx + TASK_ID_MARKER.len()..].to_string())
        .filter(|id| !id.is_empty())
}
