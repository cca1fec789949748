//! Port trait definitions (Hexagonal Architecture)
//!
//! Infrastructure adapters implement these traits; services depend only on them.

pub mod sonar_client;

pub use sonar_client::SonarClient;
