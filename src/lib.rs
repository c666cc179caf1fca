//! SkySpear Scan Engine Library
//!
//! Multi-cloud scan orchestration: discovers resources across AWS, Azure and
//! GCP, runs cost and security analysis over them, and merges the findings
//! into one prioritized report.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod platform;
pub mod providers;
pub mod scanners;
pub mod types;

#[cfg(test)]
mod test_support;

pub use config::EngineConfig;
pub use error::{ConfigError, ConnectError, PhaseError, ProviderError, ScanError};
pub use orchestrator::{merge_findings, ScanOrchestrator, ScanOutcome};
pub use platform::GovernancePlatform;
pub use providers::{CloudCredentials, CloudProviderAdapter, ConnectedProviders, ProviderFactory};
pub use scanners::FailurePolicy;
pub use types::{CloudPlatform, CloudResource, ScanOptions, ScanResults, ScanStatus};
