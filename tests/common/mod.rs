//! Common test utilities for integration tests
//!
//! Response bodies and report-task fixtures shared across test files.

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use tempfile::TempDir;

/// Body of `/api/ce/task` for a task in `status`.
pub fn task_body(task_id: &str, status: &str, analysis_id: &str) -> String {
    serde_json::json!({
        "task": {
            "id": task_id,
            "type": "REPORT",
            "componentKey": "demo",
            "status": status,
            "analysisId": analysis_id,
            "submittedAt": "2024-05-01T10:00:00+0000"
        }
    })
    .to_string()
}

/// Body of `/api/qualitygates/project_status` with two conditions.
pub fn quality_gate_body() -> String {
    serde_json::json!({
        "projectStatus": {
            "status": "OK",
            "ignoredConditions": false,
            "conditions": [
                {"status": "OK", "metricKey": "new_reliability_rating", "comparator": "GT",
                 "periodIndex": 1, "errorThreshold": "1", "actualValue": "1"},
                {"status": "OK", "metricKey": "new_coverage", "comparator": "LT",
                 "periodIndex": 1, "errorThreshold": "80", "actualValue": "91.3"}
            ],
            "periods": [{"index": 1, "mode": "previous_version", "date": "2024-05-01T09:00:00+0000"}]
        }
    })
    .to_string()
}

/// Create a project directory with a report-task file at `rel`.
pub fn project_with_report(rel: &str, contents: &str) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_file(dir.path(), rel, contents);
    dir
}

pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dirs");
    }
    fs::write(path, contents).expect("Failed to write file");
}
