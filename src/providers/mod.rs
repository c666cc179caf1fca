//! Cloud Provider Adapters
//!
//! Trait-based abstraction over the per-platform capability contract:
//! list resources, analyze costs, analyze security configuration.
//!
//! ## Architecture
//!
//! - **Adapters**: one [`CloudProviderAdapter`] per platform (AWS, Azure, GCP)
//! - **Factory**: [`ProviderFactory`] turns a credential bundle into an adapter
//! - **Snapshot**: [`ConnectedProviders`] is the immutable set of adapters a
//!   scan runs against; reconnecting never affects a scan already in flight
//!
//! The built-in adapters ([`AwsProvider`], [`AzureProvider`], [`GcpProvider`])
//! read a declarative [`ResourceInventory`] and apply per-platform rule sets.

mod aws;
mod azure;
mod gcp;
pub mod credentials;
pub mod factory;
pub mod inventory;
mod rules;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::types::{CloudPlatform, CloudResource, CostRecommendation, SecurityIssue};

pub use aws::AwsProvider;
pub use azure::AzureProvider;
pub use credentials::{AwsCredentials, AzureCredentials, CloudCredentials, GcpCredentials};
pub use factory::{InventoryProviderFactory, ProviderFactory};
pub use gcp::GcpProvider;
pub use inventory::{InventoryError, InventoryItem, ResourceInventory, ResourceKind, SecurityPosture};

/// Capability contract every cloud provider adapter implements
#[async_trait]
pub trait CloudProviderAdapter: Send + Sync {
    /// Platform this adapter talks to
    fn platform(&self) -> CloudPlatform;

    /// Enumerate the resources visible with the adapter's credentials
    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError>;

    /// Produce cost recommendations for this platform's share of a scan.
    ///
    /// `resources` may be empty; adapters can still report provider-wide findings.
    async fn analyze_costs(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError>;

    /// Produce security issues for this platform's share of a scan
    async fn analyze_security(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError>;
}

/// Immutable snapshot of the connected adapters, at most one per platform
#[derive(Clone, Default)]
pub struct ConnectedProviders {
    aws: Option<Arc<dyn CloudProviderAdapter>>,
    azure: Option<Arc<dyn CloudProviderAdapter>>,
    gcp: Option<Arc<dyn CloudProviderAdapter>>,
}

impl ConnectedProviders {
    /// Snapshot with no provider connected
    pub fn none() -> Self {
        Self::default()
    }

    /// Return a snapshot with `adapter` connected for its platform,
    /// replacing any adapter previously connected there.
    pub fn with(mut self, adapter: Arc<dyn CloudProviderAdapter>) -> Self {
        let platform = adapter.platform();
        *self.slot_mut(platform) = Some(adapter);
        self
    }

    /// Return a snapshot with `platform` disconnected
    pub fn without(mut self, platform: CloudPlatform) -> Self {
        *self.slot_mut(platform) = None;
        self
    }

    pub fn get(&self, platform: CloudPlatform) -> Option<&Arc<dyn CloudProviderAdapter>> {
        match platform {
            CloudPlatform::Aws => self.aws.as_ref(),
            CloudPlatform::Azure => self.azure.as_ref(),
            CloudPlatform::Gcp => self.gcp.as_ref(),
        }
    }

    pub fn is_connected(&self, platform: CloudPlatform) -> bool {
        self.get(platform).is_some()
    }

    /// Connected adapters in platform order (aws, azure, gcp)
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CloudProviderAdapter>> + '_ {
        CloudPlatform::ALL
            .into_iter()
            .filter_map(move |platform| self.get(platform))
    }

    /// Connected platforms in platform order
    pub fn platforms(&self) -> Vec<CloudPlatform> {
        CloudPlatform::ALL
            .into_iter()
            .filter(|p| self.is_connected(*p))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, platform: CloudPlatform) -> &mut Option<Arc<dyn CloudProviderAdapter>> {
        match platform {
            CloudPlatform::Aws => &mut self.aws,
            CloudPlatform::Azure => &mut self.azure,
            CloudPlatform::Gcp => &mut self.gcp,
        }
    }
}

impl std::fmt::Debug for ConnectedProviders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectedProviders")
            .field("platforms", &self.platforms())
            .finish()
    }
}

impl FromIterator<Arc<dyn CloudProviderAdapter>> for ConnectedProviders {
    fn from_iter<I: IntoIterator<Item = Arc<dyn CloudProviderAdapter>>>(iter: I) -> Self {
        iter.into_iter()
            .fold(ConnectedProviders::none(), |providers, adapter| providers.with(adapter))
    }
}
