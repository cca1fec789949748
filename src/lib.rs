//! sonar-evidence - SonarQube evidence resolution
//!
//! Turns the `report-task.txt` left behind by a SonarQube scanner into
//! evidence: either the in-toto statement served by the SonarQube evidence
//! integration, or a quality gate predicate assembled locally.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and the `SonarClient` port
//! - **Service Layer** (`services`): report discovery, polling, statement/predicate production
//! - **Infrastructure Layer** (`infrastructure`): HTTP client, configuration, logging
//!
//! # Example
//!
//! ```ignore
//! use sonar_evidence::{ConfigLoader, StatementResolver};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let statement = StatementResolver::new(config.sonar).resolve_statement().await?;
//!     Ok(())
//! }
//! ```

pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    EvidenceConfig, PollingConfig, PredicateEvidence, ReportTask, SonarConfig, TaskStatus,
    SONAR_PREDICATE_TYPE,
};
pub use domain::ports::SonarClient;
pub use domain::{Endpoint, EvidenceError, EvidenceResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::sonar::SonarHttpClient;
pub use services::{EvidenceProvider, ResolvedEvidence, StatementResolver};
