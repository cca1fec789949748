//! Domain models

pub mod config;
pub mod quality_gate;
pub mod report_task;
pub mod task;

pub use config::{
    EvidenceConfig, LoggingConfig, PollingConfig, SonarConfig, DEFAULT_MAX_RETRIES,
    DEFAULT_RETRY_INTERVAL_MS,
};
pub use quality_gate::{
    Gate, GateCondition, Period, PredicateEvidence, ProjectStatus, QualityGateCondition,
    QualityGatesAnalysis, SonarPredicate, SONAR_PREDICATE_TYPE,
};
pub use report_task::{task_id_from_url, ReportTask};
pub use task::{Task, TaskDetails, TaskStatus};
