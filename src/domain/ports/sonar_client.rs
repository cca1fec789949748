//! SonarQube server port.

use async_trait::async_trait;

use crate::domain::errors::EvidenceResult;
use crate::domain::models::{QualityGatesAnalysis, TaskDetails};

/// Read-only access to a SonarQube / SonarCloud server.
///
/// All operations are idempotent GETs. The engine only talks to the server
/// through this trait so it can be exercised without a network.
#[async_trait]
pub trait SonarClient: Send + Sync {
    /// Fetch Compute Engine task details.
    ///
    /// Returns `Ok(None)` without making a request when `ce_task_id` is empty.
    async fn get_task_details(&self, ce_task_id: &str) -> EvidenceResult<Option<TaskDetails>>;

    /// Fetch the quality gate status of a completed analysis.
    async fn get_quality_gate_analysis(
        &self,
        analysis_id: &str,
    ) -> EvidenceResult<QualityGatesAnalysis>;

    /// Fetch a ready-made in-toto statement from the enterprise integration endpoint.
    async fn get_intoto_statement(&self, ce_task_id: &str) -> EvidenceResult<Vec<u8>>;
}
