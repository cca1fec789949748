//! End-to-end evidence resolution tests
//!
//! A report-task file in a temporary project points at a mockito server;
//! the resolver goes through discovery, polling and the HTTP client.

mod common;

use mockito::{Matcher, Server, ServerGuard};
use sonar_evidence::{
    EvidenceError, ResolvedEvidence, SonarConfig, StatementResolver, SONAR_PREDICATE_TYPE,
};

use common::{project_with_report, quality_gate_body, task_body};

fn fast_config() -> SonarConfig {
    SonarConfig {
        polling_max_retries: Some(100),
        polling_retry_interval_ms: Some(5),
        ..SonarConfig::default()
    }
}

fn report_for(server: &ServerGuard) -> String {
    format!(
        "projectKey=demo\nserverUrl={url}\nceTaskId=T1\nceTaskUrl={url}/api/ce/task?id=T1\n",
        url = server.url()
    )
}

async fn mock_task(server: &mut ServerGuard, status: &str, analysis_id: &str) -> mockito::Mock {
    server
        .mock("GET", "/api/ce/task")
        .match_query(Matcher::UrlEncoded("id".into(), "T1".into()))
        .with_status(200)
        .with_body(task_body("T1", status, analysis_id))
        .expect(1)
        .create_async()
        .await
}

#[tokio::test]
async fn test_statement_available_immediately() {
    let mut server = Server::new_async().await;
    let statement = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_body(r#"{"_type":"statement"}"#)
        .expect(1)
        .create_async()
        .await;
    let task = server
        .mock("GET", "/api/ce/task")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let project = project_with_report("target/sonar/report-task.txt", &report_for(&server));
    let body = StatementResolver::new(fast_config())
        .with_working_dir(project.path())
        .with_token(Some("secret".to_string()))
        .resolve_statement()
        .await
        .unwrap();

    assert_eq!(body, br#"{"_type":"statement"}"#);
    statement.assert_async().await;
    task.assert_async().await;
}

#[tokio::test]
async fn test_statement_after_polling_to_success() {
    let mut server = Server::new_async().await;
    let not_ready = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(404)
        .with_body("not ready")
        .expect(1)
        .create_async()
        .await;
    let ready = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(200)
        .with_body("statement")
        .expect(1)
        .create_async()
        .await;
    let pending = mock_task(&mut server, "PENDING", "").await;
    let in_progress = mock_task(&mut server, "IN_PROGRESS", "").await;
    let success = mock_task(&mut server, "SUCCESS", "A1").await;

    let project = project_with_report(".scannerwork/report-task.txt", &report_for(&server));
    let body = StatementResolver::new(fast_config())
        .with_working_dir(project.path())
        .with_token(None)
        .resolve_statement()
        .await
        .unwrap();

    assert_eq!(body, b"statement");
    not_ready.assert_async().await;
    ready.assert_async().await;
    pending.assert_async().await;
    in_progress.assert_async().await;
    success.assert_async().await;
}

#[tokio::test]
async fn test_evidence_falls_back_to_quality_gate_predicate() {
    let mut server = Server::new_async().await;
    let forbidden = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(403)
        .with_body("Forbidden")
        .expect(2)
        .create_async()
        .await;
    let success = mock_task(&mut server, "SUCCESS", "A1").await;
    let gates = server
        .mock("GET", "/api/qualitygates/project_status")
        .match_query(Matcher::UrlEncoded("analysisId".into(), "A1".into()))
        .with_status(200)
        .with_body(quality_gate_body())
        .expect(1)
        .create_async()
        .await;

    let project = project_with_report("target/sonar/report-task.txt", &report_for(&server));
    let evidence = StatementResolver::new(fast_config())
        .with_working_dir(project.path())
        .with_token(Some("t".to_string()))
        .resolve_evidence()
        .await
        .unwrap();

    let ResolvedEvidence::Predicate(predicate) = evidence else {
        panic!("expected predicate fallback");
    };
    assert_eq!(predicate.predicate_type, SONAR_PREDICATE_TYPE);
    let value: serde_json::Value = serde_json::from_slice(&predicate.predicate).unwrap();
    assert_eq!(value["gates"][0]["type"], "QUALITY");
    assert_eq!(value["gates"][0]["status"], "OK");
    assert_eq!(value["gates"][0]["conditions"][1]["metricKey"], "new_coverage");
    assert!(value["gates"][0]["conditions"][0].get("periodIndex").is_none());

    forbidden.assert_async().await;
    success.assert_async().await;
    gates.assert_async().await;
}

#[tokio::test]
async fn test_statement_entitlement_error_surfaces() {
    let mut server = Server::new_async().await;
    let _forbidden = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(403)
        .with_body("Forbidden")
        .create_async()
        .await;
    let _success = mock_task(&mut server, "SUCCESS", "A1").await;

    let project = project_with_report("target/sonar/report-task.txt", &report_for(&server));
    let err = StatementResolver::new(fast_config())
        .with_working_dir(project.path())
        .with_token(None)
        .resolve_statement()
        .await
        .unwrap_err();

    assert!(err.is_entitlement());
    assert!(err.to_string().contains("missing entitlement"));
}

#[tokio::test]
async fn test_failed_task_is_reported() {
    let mut server = Server::new_async().await;
    let _not_ready = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(404)
        .create_async()
        .await;
    let _failed = mock_task(&mut server, "FAILED", "").await;

    let project = project_with_report("build/sonar/report-task.txt", &report_for(&server));
    let err = StatementResolver::new(fast_config())
        .with_working_dir(project.path())
        .with_token(None)
        .resolve_evidence()
        .await
        .unwrap_err();

    match err {
        EvidenceError::TaskFailed { task_id, status } => {
            assert_eq!(task_id, "T1");
            assert_eq!(status, "FAILED");
        }
        other => panic!("expected task failure, got {other:?}"),
    }
}

#[tokio::test]
async fn test_polling_gives_up_after_max_retries() {
    let mut server = Server::new_async().await;
    let _not_ready = server
        .mock("GET", "/dop-translation/jfrog-evidence/T1")
        .with_status(404)
        .create_async()
        .await;
    let pending = server
        .mock("GET", "/api/ce/task")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(task_body("T1", "PENDING", ""))
        .expect_at_least(2)
        .create_async()
        .await;

    let config = SonarConfig {
        polling_max_retries: Some(2),
        polling_retry_interval_ms: Some(50),
        ..SonarConfig::default()
    };
    let project = project_with_report("target/sonar/report-task.txt", &report_for(&server));
    let err = StatementResolver::new(config)
        .with_working_dir(project.path())
        .with_token(None)
        .resolve_statement()
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    pending.assert_async().await;
}

#[tokio::test]
async fn test_configured_report_path_is_used() {
    let mut server = Server::new_async().await;
    let statement = server
        .mock("GET", "/dop-translation/jfrog-evidence/CUSTOM")
        .with_status(200)
        .with_body("custom")
        .expect(1)
        .create_async()
        .await;

    let report = format!("serverUrl={}\nceTaskId=CUSTOM\n", server.url());
    let project = project_with_report("reports/sonar.txt", &report);
    let config = SonarConfig {
        report_task_file: Some(project.path().join("reports/sonar.txt").display().to_string()),
        ..fast_config()
    };

    let body = StatementResolver::new(config)
        .with_token(None)
        .resolve_statement()
        .await
        .unwrap();

    assert_eq!(body, b"custom");
    statement.assert_async().await;
}
