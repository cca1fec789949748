//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - `evidence.yml` discovery (project `.jfrog` dir, then JFrog home)
//! - Environment variable overrides
//! - Configuration validation

pub mod loader;

pub use loader::{jfrog_home_dir, ConfigError, ConfigLoader};
