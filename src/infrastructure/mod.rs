//! Infrastructure layer module
//!
//! Adapters and external integrations:
//! - SonarQube HTTP client
//! - Configuration management
//! - Logging infrastructure
//! - Credentials management
//!
//! Infrastructure implementations satisfy the port traits defined in the domain layer.

pub mod config;
pub mod credentials;
pub mod logging;
pub mod sonar;
