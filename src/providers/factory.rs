//! Provider factory: credential bundle in, connected adapter out

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::credentials::{AwsCredentials, AzureCredentials, GcpCredentials};
use super::inventory::ResourceInventory;
use super::{AwsProvider, AzureProvider, CloudProviderAdapter, GcpProvider};
use crate::error::ConnectError;
use crate::types::CloudPlatform;

/// Builds adapters from credential bundles.
///
/// The engine never looks inside a bundle; validating it is up to the factory.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    async fn create_aws(
        &self,
        credentials: &AwsCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError>;

    async fn create_azure(
        &self,
        credentials: &AzureCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError>;

    async fn create_gcp(
        &self,
        credentials: &GcpCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError>;
}

/// Factory for the built-in inventory-backed adapters
#[derive(Debug, Clone, Default)]
pub struct InventoryProviderFactory {
    inventory: ResourceInventory,
}

impl InventoryProviderFactory {
    pub fn new(inventory: ResourceInventory) -> Self {
        Self { inventory }
    }

    pub fn inventory(&self) -> &ResourceInventory {
        &self.inventory
    }
}

fn require(platform: CloudPlatform, field: &str, value: &str) -> Result<(), ConnectError> {
    if value.trim().is_empty() {
        return Err(ConnectError::InvalidCredentials {
            platform,
            reason: format!("{} is empty", field),
        });
    }
    Ok(())
}

#[async_trait]
impl ProviderFactory for InventoryProviderFactory {
    async fn create_aws(
        &self,
        credentials: &AwsCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError> {
        require(CloudPlatform::Aws, "access key", &credentials.access_key)?;
        require(CloudPlatform::Aws, "secret key", &credentials.secret_key)?;

        let items = self.inventory.for_platform(CloudPlatform::Aws);
        info!(items = items.len(), "AWS provider initialized");

        Ok(Arc::new(AwsProvider::new(credentials.region.clone(), items)))
    }

    async fn create_azure(
        &self,
        credentials: &AzureCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError> {
        require(CloudPlatform::Azure, "subscription id", &credentials.subscription_id)?;
        require(CloudPlatform::Azure, "tenant id", &credentials.tenant_id)?;

        if credentials.client_secret.is_some() && credentials.client_id.is_none() {
            return Err(ConnectError::InvalidCredentials {
                platform: CloudPlatform::Azure,
                reason: "client secret given without a client id".to_string(),
            });
        }

        let items = self.inventory.for_platform(CloudPlatform::Azure);
        info!(
            subscription = %credentials.subscription_id,
            items = items.len(),
            "Azure provider initialized"
        );

        Ok(Arc::new(AzureProvider::new(&credentials.subscription_id, items)))
    }

    async fn create_gcp(
        &self,
        credentials: &GcpCredentials,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError> {
        require(CloudPlatform::Gcp, "project id", &credentials.project_id)?;

        if let Some(path) = &credentials.key_file_path {
            debug!(key_file = ?path, "GCP key file configured");
        }

        let items = self.inventory.for_platform(CloudPlatform::Gcp);
        info!(project = %credentials.project_id, items = items.len(), "GCP provider initialized");

        Ok(Arc::new(GcpProvider::new(&credentials.project_id, items)))
    }
}
