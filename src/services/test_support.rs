//! Scripted in-memory `SonarClient` for service tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::errors::{Endpoint, EvidenceError, EvidenceResult};
use crate::domain::models::{
    ProjectStatus, QualityGateCondition, QualityGatesAnalysis, TaskDetails, TaskStatus,
};
use crate::domain::ports::SonarClient;

/// Responses are consumed in order; an exhausted status script repeats
/// `fallback_status` if set and panics otherwise.
#[derive(Default)]
pub struct ScriptedSonarClient {
    statuses: Mutex<VecDeque<EvidenceResult<TaskDetails>>>,
    fallback_status: Option<TaskStatus>,
    statements: Mutex<VecDeque<EvidenceResult<Vec<u8>>>>,
    quality_gates: Mutex<VecDeque<EvidenceResult<QualityGatesAnalysis>>>,
    pub task_calls: AtomicUsize,
    pub statement_calls: AtomicUsize,
    pub quality_gate_calls: AtomicUsize,
    pub quality_gate_ids: Mutex<Vec<String>>,
}

impl ScriptedSonarClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, statuses: &[(&str, &str)]) -> Self {
        self.statuses.lock().unwrap().extend(
            statuses
                .iter()
                .map(|(status, analysis_id)| Ok(TaskDetails::with_status(*status, analysis_id))),
        );
        self
    }

    pub fn with_status_error(self, err: EvidenceError) -> Self {
        self.statuses.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn with_fallback_status(mut self, status: TaskStatus) -> Self {
        self.fallback_status = Some(status);
        self
    }

    pub fn with_statement(self, statement: EvidenceResult<Vec<u8>>) -> Self {
        self.statements.lock().unwrap().push_back(statement);
        self
    }

    pub fn with_quality_gate(self, analysis: EvidenceResult<QualityGatesAnalysis>) -> Self {
        self.quality_gates.lock().unwrap().push_back(analysis);
        self
    }

    pub fn task_calls(&self) -> usize {
        self.task_calls.load(Ordering::SeqCst)
    }

    pub fn statement_calls(&self) -> usize {
        self.statement_calls.load(Ordering::SeqCst)
    }

    pub fn quality_gate_calls(&self) -> usize {
        self.quality_gate_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.task_calls() + self.statement_calls() + self.quality_gate_calls()
    }
}

#[async_trait]
impl SonarClient for ScriptedSonarClient {
    async fn get_task_details(&self, ce_task_id: &str) -> EvidenceResult<Option<TaskDetails>> {
        if ce_task_id.is_empty() {
            return Ok(None);
        }
        self.task_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().unwrap().pop_front();
        match (next, &self.fallback_status) {
            (Some(result), _) => result.map(Some),
            (None, Some(status)) => Ok(Some(TaskDetails::with_status(status.clone(), ""))),
            (None, None) => panic!("unexpected task status call"),
        }
    }

    async fn get_quality_gate_analysis(
        &self,
        analysis_id: &str,
    ) -> EvidenceResult<QualityGatesAnalysis> {
        self.quality_gate_calls.fetch_add(1, Ordering::SeqCst);
        self.quality_gate_ids
            .lock()
            .unwrap()
            .push(analysis_id.to_string());
        self.quality_gates
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected quality gate call")
    }

    async fn get_intoto_statement(&self, _ce_task_id: &str) -> EvidenceResult<Vec<u8>> {
        self.statement_calls.fetch_add(1, Ordering::SeqCst);
        self.statements
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected statement call")
    }
}

pub fn enterprise_error(status: u16) -> EvidenceError {
    EvidenceError::Http {
        endpoint: Endpoint::Enterprise,
        status,
        body: format!("{{\"errors\":[{{\"msg\":\"status {status}\"}}]}}"),
    }
}

pub fn sample_analysis() -> QualityGatesAnalysis {
    QualityGatesAnalysis {
        project_status: ProjectStatus {
            status: "OK".to_string(),
            ignored_conditions: false,
            conditions: vec![
                QualityGateCondition {
                    status: "OK".to_string(),
                    metric_key: "new_reliability_rating".to_string(),
                    comparator: "GT".to_string(),
                    period_index: 1,
                    error_threshold: "1".to_string(),
                    actual_value: "1".to_string(),
                },
                QualityGateCondition {
                    status: "OK".to_string(),
                    metric_key: "new_coverage".to_string(),
                    comparator: "LT".to_string(),
                    period_index: 1,
                    error_threshold: "80".to_string(),
                    actual_value: "91.5".to_string(),
                },
            ],
            periods: vec![],
        },
    }
}
