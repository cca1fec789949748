//! Normalization of enterprise endpoint failures.

use tracing::debug;

use crate::domain::errors::{Endpoint, EvidenceError};

/// Map 403/404 from the enterprise statement endpoint to
/// [`EvidenceError::EntitlementMissing`]. Everything else passes through.
pub fn classify_statement_error(err: EvidenceError) -> EvidenceError {
    match err {
        EvidenceError::Http {
            endpoint: Endpoint::Enterprise,
            status: status @ (403 | 404),
            body,
        } => {
            debug!(status, %body, "enterprise endpoint unavailable for this plan");
            EvidenceError::EntitlementMissing { status }
        }
        other => other,
    }
}
