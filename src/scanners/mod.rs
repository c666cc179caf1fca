//! Scan phases
//!
//! Each scanner fans one adapter call out to every connected provider, waits
//! for all of them and concatenates the results in platform order
//! (aws, azure, gcp), never in completion order.

mod cost;
mod resource;
mod security;

pub use cost::CostScanner;
pub use resource::ResourceScanner;
pub use security::SecurityScanner;

use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::{join_all, try_join_all};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{PhaseError, ProviderError};
use crate::providers::{CloudProviderAdapter, ConnectedProviders};
use crate::types::{CloudPlatform, CloudResource, ProviderFailure, ScanPhase};

/// How a phase reacts to a failing provider call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Any failing call fails the whole phase
    #[default]
    FailFast,
    /// Failing calls are recorded and the other providers' results are kept
    Isolate,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fail-fast" | "failfast" => Ok(FailurePolicy::FailFast),
            "isolate" => Ok(FailurePolicy::Isolate),
            other => Err(format!("unknown failure policy: {}", other)),
        }
    }
}

impl std::fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailurePolicy::FailFast => write!(f, "fail-fast"),
            FailurePolicy::Isolate => write!(f, "isolate"),
        }
    }
}

/// Items gathered by one phase, plus the calls that failed under
/// [`FailurePolicy::Isolate`]
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutput<T> {
    pub items: Vec<T>,
    pub failures: Vec<ProviderFailure>,
}

impl<T> Default for PhaseOutput<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> PhaseOutput<T> {
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

/// Issue `call` against every connected adapter and gather the results.
///
/// All calls are started before any is awaited. Results are consumed in
/// platform order.
pub(crate) async fn fan_out<'a, T, F, Fut>(
    providers: &'a ConnectedProviders,
    phase: ScanPhase,
    policy: FailurePolicy,
    call: F,
) -> Result<PhaseOutput<T>, PhaseError>
where
    F: Fn(&'a Arc<dyn CloudProviderAdapter>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ProviderError>>,
{
    debug!(
        phase = %phase,
        providers = providers.len(),
        policy = %policy,
        "Dispatching provider calls"
    );

    match policy {
        FailurePolicy::FailFast => {
            let results = try_join_all(providers.iter().map(&call))
                .await
                .map_err(|source| PhaseError { phase, source })?;

            Ok(PhaseOutput {
                items: results.into_iter().flatten().collect(),
                failures: Vec::new(),
            })
        }
        FailurePolicy::Isolate => {
            let calls = providers.iter().map(|adapter| {
                let platform = adapter.platform();
                let pending = call(adapter);
                async move { (platform, pending.await) }
            });

            let mut output = PhaseOutput::default();
            for (platform, result) in join_all(calls).await {
                match result {
                    Ok(items) => output.items.extend(items),
                    Err(e) => {
                        warn!(platform = %platform, phase = %phase, error = %e, "Provider call failed");
                        output.failures.push(ProviderFailure {
                            platform,
                            phase,
                            message: e.to_string(),
                        });
                    }
                }
            }

            Ok(output)
        }
    }
}

/// Resources grouped by the platform that reported them, order preserved
#[derive(Debug, Default)]
pub(crate) struct PlatformPartition {
    by_platform: HashMap<CloudPlatform, Vec<CloudResource>>,
}

impl PlatformPartition {
    pub(crate) fn new(resources: &[CloudResource]) -> Self {
        let mut by_platform: HashMap<CloudPlatform, Vec<CloudResource>> = HashMap::new();
        for resource in resources {
            by_platform
                .entry(resource.platform)
                .or_default()
                .push(resource.clone());
        }
        Self { by_platform }
    }

    /// The platform's share; empty when it reported nothing
    pub(crate) fn resources_for(&self, platform: CloudPlatform) -> &[CloudResource] {
        self.by_platform
            .get(&platform)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
