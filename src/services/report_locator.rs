//! Locates the scanner's `report-task.txt`.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Conventional report locations, relative to the project root.
pub const REPORT_TASK_CANDIDATES: [&str; 4] = [
    "target/sonar/report-task.txt",          // maven
    "build/sonar/report-task.txt",           // gradle
    ".scannerwork/report-task.txt",          // cli
    ".sonarqube/out/.sonar/report-task.txt", // msbuild
];

/// Return the first existing report file.
///
/// A configured path is tried first; relative paths (configured or
/// conventional) are resolved against `root`. Absence is not an error here.
pub fn locate_report_task(root: &Path, configured: Option<&str>) -> Option<PathBuf> {
    if let Some(configured) = configured.filter(|p| !p.is_empty()) {
        let path = root.join(configured);
        if path.is_file() {
            debug!(path = %path.display(), "found configured report");
            return Some(path);
        }
        debug!(path = %path.display(), "configured report does not exist");
    }

    let found = REPORT_TASK_CANDIDATES
        .iter()
        .map(|candidate| root.join(candidate))
        .find(|path| path.is_file());

    match &found {
        Some(path) => debug!(path = %path.display(), "found report"),
        None => debug!(root = %root.display(), "no report task file found"),
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "ceTaskId=X\n").unwrap();
        path
    }

    #[test]
    fn test_nothing_found() {
        let dir = TempDir::new().unwrap();
        assert!(locate_report_task(dir.path(), None).is_none());
    }

    #[test]
    fn test_configured_path_wins() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "target/sonar/report-task.txt");
        let custom = touch(dir.path(), "custom/report.txt");

        let found = locate_report_task(dir.path(), Some("custom/report.txt"));
        assert_eq!(found, Some(custom));
    }

    #[test]
    fn test_absolute_configured_path() {
        let dir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let custom = touch(other.path(), "report-task.txt");

        let found = locate_report_task(dir.path(), custom.to_str());
        assert_eq!(found, Some(custom));
    }

    #[test]
    fn test_missing_configured_path_falls_back_to_candidates() {
        let dir = TempDir::new().unwrap();
        let gradle = touch(dir.path(), "build/sonar/report-task.txt");

        let found = locate_report_task(dir.path(), Some("does/not/exist.txt"));
        assert_eq!(found, Some(gradle));
    }

    #[test]
    fn test_candidate_order_maven_first() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), ".scannerwork/report-task.txt");
        let maven = touch(dir.path(), "target/sonar/report-task.txt");
        touch(dir.path(), ".sonarqube/out/.sonar/report-task.txt");

        assert_eq!(locate_report_task(dir.path(), None), Some(maven));
    }

    #[test]
    fn test_msbuild_location() {
        let dir = TempDir::new().unwrap();
        let msbuild = touch(dir.path(), ".sonarqube/out/.sonar/report-task.txt");
        assert_eq!(locate_report_task(dir.path(), None), Some(msbuild));
    }

    #[test]
    fn test_directory_is_not_a_report() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("target/sonar/report-task.txt")).unwrap();
        assert!(locate_report_task(dir.path(), None).is_none());
    }
}
