//! Evidence resolution services
//!
//! Report discovery and parsing, server URL resolution, task polling and
//! statement/predicate production.

pub mod base_url;
pub mod error_classifier;
pub mod evidence_provider;
pub mod report_locator;
pub mod report_parser;
pub mod statement_resolver;
pub mod task_poller;

#[cfg(test)]
pub(crate) mod test_support;

pub use base_url::{resolve_base_url, DEFAULT_SONAR_URL};
pub use error_classifier::classify_statement_error;
pub use evidence_provider::EvidenceProvider;
pub use report_locator::{locate_report_task, REPORT_TASK_CANDIDATES};
pub use report_parser::{parse_properties, parse_report_task};
pub use statement_resolver::{ClientFactory, ResolvedEvidence, StatementResolver};
pub use task_poller::poll_until_terminal;
