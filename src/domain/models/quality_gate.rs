//! Quality gate analysis and the predicate assembled from it.

use serde::{Deserialize, Serialize};

/// Predicate type attached to locally-assembled quality gate predicates.
pub const SONAR_PREDICATE_TYPE: &str = "https://jfrog.com/evidence/sonarqube/v1";

/// Body of `GET /api/qualitygates/project_status?analysisId=<id>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGatesAnalysis {
    /// Gate evaluation for the analysed project
    pub project_status: ProjectStatus,
}

/// Quality gate result of one analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectStatus {
    /// Overall gate status, e.g. `OK` or `ERROR`.
    pub status: String,
    /// Evaluated conditions, in server order
    pub conditions: Vec<QualityGateCondition>,
    /// Comparison periods referenced by `period_index`
    pub periods: Vec<Period>,
    /// Some conditions were ignored by the server
    pub ignored_conditions: bool,
}

/// One evaluated quality gate condition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QualityGateCondition {
    /// `OK` or `ERROR`
    pub status: String,
    /// Metric the condition checks, e.g. `new_coverage`
    pub metric_key: String,
    /// `GT` or `LT`
    pub comparator: String,
    /// Period the value was measured over
    pub period_index: i64,
    /// Threshold that fails the gate
    pub error_threshold: String,
    /// Measured value
    pub actual_value: String,
}

/// Comparison period, e.g. new code since the previous version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Period {
    /// Index referenced by conditions
    pub index: i64,
    /// Period mode, e.g. `previous_version`
    pub mode: String,
    /// Period start date
    pub date: String,
}

/// Fallback predicate: exactly one `QUALITY` gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SonarPredicate {
    /// Always exactly one `QUALITY` gate
    pub gates: Vec<Gate>,
}

/// A gate in the predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gate {
    /// Gate kind, `QUALITY`
    #[serde(rename = "type")]
    pub gate_type: String,
    /// Overall gate status
    pub status: String,
    /// Copied from the analysis
    pub ignored_conditions: bool,
    /// Conditions in server order
    pub conditions: Vec<GateCondition>,
}

/// Predicate condition: an analysis condition without its period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateCondition {
    /// `OK` or `ERROR`
    pub status: String,
    /// Metric the condition checks
    pub metric_key: String,
    /// `GT` or `LT`
    pub comparator: String,
    /// Threshold that fails the gate
    pub error_threshold: String,
    /// Measured value
    pub actual_value: String,
}

impl From<&QualityGateCondition> for GateCondition {
    fn from(c: &QualityGateCondition) -> Self {
        Self {
            status: c.status.clone(),
            metric_key: c.metric_key.clone(),
            comparator: c.comparator.clone(),
            error_threshold: c.error_threshold.clone(),
            actual_value: c.actual_value.clone(),
        }
    }
}

impl From<&QualityGatesAnalysis> for SonarPredicate {
    fn from(analysis: &QualityGatesAnalysis) -> Self {
        let status = &analysis.project_status;
        Self {
            gates: vec![Gate {
                gate_type: "QUALITY".to_string(),
                status: status.status.clone(),
                ignored_conditions: status.ignored_conditions,
                // Order of conditions is preserved from the response.
                conditions: status.conditions.iter().map(GateCondition::from).collect(),
            }],
        }
    }
}

/// Predicate bytes plus the predicate type they should be recorded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateEvidence {
    /// Predicate type URI
    pub predicate_type: String,
    /// Serialized [`SonarPredicate`] JSON
    pub predicate: Vec<u8>,
}
