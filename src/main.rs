//! sonar-evidence entry point.
//!
//! Resolves SonarQube evidence for the project in the current directory and
//! writes it to stdout. Logs go to stderr.

use std::io::Write;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use sonar_evidence::infrastructure::logging::{LogConfig, LoggerImpl};
use sonar_evidence::{ConfigLoader, EvidenceError, ResolvedEvidence, StatementResolver};

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        if let Some(hint) = err.downcast_ref::<EvidenceError>().and_then(hint_for) {
            eprintln!("{hint}");
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = ConfigLoader::load()?;
    let _logger = LoggerImpl::init(&LogConfig::from(&config.logging))?;
    for warning in &config.load_warnings {
        tracing::warn!("{warning}");
    }

    let cancellation = CancellationToken::new();
    let ctrl_c = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, cancelling");
            ctrl_c.cancel();
        }
    });

    let evidence = StatementResolver::new(config.sonar)
        .with_cancellation(cancellation)
        .resolve_evidence()
        .await?;

    let payload = match evidence {
        ResolvedEvidence::Statement(statement) => statement,
        ResolvedEvidence::Predicate(predicate) => {
            let body: serde_json::Value = serde_json::from_slice(&predicate.predicate)
                .context("Failed to decode quality gate predicate")?;
            serde_json::to_vec(&serde_json::json!({
                "predicateType": predicate.predicate_type,
                "predicate": body,
            }))?
        }
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&payload)?;
    stdout.flush()?;
    Ok(())
}

/// Guidance for error categories the user can act on.
fn hint_for(err: &EvidenceError) -> Option<&'static str> {
    match err {
        EvidenceError::PollingTimeout { .. } => Some(
            "The analysis is still running. Increase pollingMaxRetries or \
             pollingRetryIntervalMs (or POLLING_MAX_RETRIES / POLLING_RETRY_INTERVAL_MS).",
        ),
        EvidenceError::ReportNotFound => Some(
            "Run the SonarQube scanner first, or set sonar.reportTaskFile / REPORT_TASK_FILE.",
        ),
        EvidenceError::MissingTaskId => {
            Some("The report-task file has no ceTaskId and no ceTaskUrl with an '?id=' parameter.")
        }
        _ => None,
    }
}
