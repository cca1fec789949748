//! Domain layer for SonarQube evidence resolution
//!
//! Pure types: errors, models and the ports implemented by infrastructure.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{Endpoint, EvidenceError, EvidenceResult};
