//! Fixed-interval polling of a Compute Engine task.

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::errors::{Endpoint, EvidenceError, EvidenceResult};
use crate::domain::models::PollingConfig;
use crate::domain::ports::SonarClient;

/// Poll task status until it reaches a terminal state.
///
/// Returns the analysis id on `SUCCESS`. `FAILED`/`CANCELED` end polling
/// with [`EvidenceError::TaskFailed`]. Any other status sleeps for the retry
/// interval and polls again until `max_retries * retry_interval` has
/// elapsed. Errors from the status endpoint are returned immediately.
///
/// The cancellation token is checked before every poll and raced against
/// every sleep.
pub async fn poll_until_terminal(
    client: &dyn SonarClient,
    ce_task_id: &str,
    polling: PollingConfig,
    cancellation: &CancellationToken,
) -> EvidenceResult<String> {
    let interval = polling.interval();
    let timeout = polling.timeout();
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        if cancellation.is_cancelled() {
            return Err(EvidenceError::Cancelled {
                task_id: ce_task_id.to_string(),
            });
        }

        attempt += 1;
        let details = client
            .get_task_details(ce_task_id)
            .await?
            .ok_or(EvidenceError::MissingTaskId)?;
        let status = details.task.status;

        if status.is_success() {
            let analysis_id = details.task.analysis_id;
            if analysis_id.is_empty() {
                return Err(EvidenceError::Decode {
                    endpoint: Endpoint::TaskStatus,
                    message: format!("task {ce_task_id} succeeded without an analysisId"),
                });
            }
            info!(task_id = ce_task_id, %analysis_id, attempt, "task completed successfully");
            return Ok(analysis_id);
        }
        if status.is_terminal() {
            return Err(EvidenceError::TaskFailed {
                task_id: ce_task_id.to_string(),
                status: status.to_string(),
            });
        }

        if started.elapsed() + interval > timeout {
            return Err(EvidenceError::PollingTimeout {
                task_id: ce_task_id.to_string(),
                timeout,
            });
        }

        debug!(task_id = ce_task_id, %status, attempt, "task not finished, continuing to poll");
        tokio::select! {
            () = cancellation.cancelled() => {
                return Err(EvidenceError::Cancelled {
                    task_id: ce_task_id.to_string(),
                });
            }
            () = sleep(interval) => {}
        }
    }
}
