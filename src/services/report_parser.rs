//! Parser for the flat `key=value` report-task format.

use std::collections::HashMap;
use std::path::Path;

use tracing::warn;

use crate::domain::errors::{EvidenceError, EvidenceResult};
use crate::domain::models::ReportTask;

/// Read and parse a report-task file.
pub fn parse_report_task(path: &Path) -> EvidenceResult<ReportTask> {
    let contents = std::fs::read_to_string(path).map_err(|source| EvidenceError::ReportRead {
        path: path.to_path_buf(),
        source,
    })?;

    let report = ReportTask::from_properties(parse_properties(&contents));
    if !report.has_task_id() {
        if let Some(url) = &report.ce_task_url {
            warn!(
                path = %path.display(),
                ce_task_url = %url,
                "ceTaskUrl has no '?id=' parameter; task id could not be derived"
            );
        }
    }
    Ok(report)
}

/// Parse `key=value` lines.
///
/// Blank lines and `#` comments are skipped, the first `=` splits key from
/// value, both sides are trimmed. Lines without `=` are ignored and later
/// duplicates overwrite earlier ones.
pub fn parse_properties(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}
