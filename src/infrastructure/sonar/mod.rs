//! SonarQube server adapter
//!
//! HTTP implementation of the [`SonarClient`](crate::domain::ports::SonarClient) port.

pub mod client;

pub use client::{enterprise_base_url, SonarHttpClient};
