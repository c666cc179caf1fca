//! Governance platform facade
//!
//! Owns the provider factory and the set of connected adapters, and hands a
//! snapshot of that set to the orchestrator for every scan.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::error::{ConnectError, ScanError};
use crate::orchestrator::{ScanOrchestrator, ScanOutcome};
use crate::providers::{CloudCredentials, CloudProviderAdapter, ConnectedProviders, ProviderFactory};
use crate::types::{CloudPlatform, ScanOptions, ScanResults};

pub struct GovernancePlatform {
    orchestrator: ScanOrchestrator,
    factory: Arc<dyn ProviderFactory>,
    providers: ConnectedProviders,
}

impl GovernancePlatform {
    pub fn new(config: EngineConfig, factory: Arc<dyn ProviderFactory>) -> Self {
        Self {
            orchestrator: ScanOrchestrator::new(config),
            factory,
            providers: ConnectedProviders::none(),
        }
    }

    /// Connect every platform that has a credential bundle.
    ///
    /// Reconnecting a platform replaces its adapter. If any platform fails
    /// to connect, nothing from this call is kept and the error names the
    /// platform. Returns the platforms connected by this call.
    pub async fn connect_providers(
        &mut self,
        credentials: &CloudCredentials,
    ) -> Result<Vec<CloudPlatform>, ConnectError> {
        let mut staged = self.providers.clone();
        let mut connected = Vec::new();

        if let Some(aws) = &credentials.aws {
            let adapter = self.factory.create_aws(aws).await;
            staged = staged.with(Self::accept(CloudPlatform::Aws, adapter)?);
            connected.push(CloudPlatform::Aws);
        }

        if let Some(azure) = &credentials.azure {
            let adapter = self.factory.create_azure(azure).await;
            staged = staged.with(Self::accept(CloudPlatform::Azure, adapter)?);
            connected.push(CloudPlatform::Azure);
        }

        if let Some(gcp) = &credentials.gcp {
            let adapter = self.factory.create_gcp(gcp).await;
            staged = staged.with(Self::accept(CloudPlatform::Gcp, adapter)?);
            connected.push(CloudPlatform::Gcp);
        }

        self.providers = staged;
        info!(connected = ?connected, total = self.providers.len(), "Providers connected");
        Ok(connected)
    }

    fn accept(
        expected: CloudPlatform,
        adapter: Result<Arc<dyn CloudProviderAdapter>, ConnectError>,
    ) -> Result<Arc<dyn CloudProviderAdapter>, ConnectError> {
        let adapter = adapter.map_err(|e| {
            warn!(platform = %expected, error = %e, "Provider connection failed");
            e
        })?;

        if adapter.platform() != expected {
            return Err(ConnectError::Initialization {
                platform: expected,
                reason: format!("factory returned a {} adapter", adapter.platform()),
            });
        }

        info!(platform = %expected, "Connected to provider");
        Ok(adapter)
    }

    /// Remove the adapter of one platform; scans already running keep theirs
    pub fn disconnect(&mut self, platform: CloudPlatform) {
        self.providers = std::mem::take(&mut self.providers).without(platform);
    }

    /// Connected platforms in platform order
    pub fn connected(&self) -> Vec<CloudPlatform> {
        self.providers.platforms()
    }

    /// The adapters a scan started now would run against
    pub fn snapshot(&self) -> ConnectedProviders {
        self.providers.clone()
    }

    pub fn orchestrator(&self) -> &ScanOrchestrator {
        &self.orchestrator
    }

    pub async fn scan_environment(&self, options: &ScanOptions) -> Result<ScanResults, ScanError> {
        let providers = self.snapshot();
        self.orchestrator.run_scan(&providers, options).await
    }

    pub async fn scan_environment_report(&self, options: &ScanOptions) -> ScanOutcome {
        let providers = self.snapshot();
        self.orchestrator.run_scan_report(&providers, options).await
    }
}

impl std::fmt::Debug for GovernancePlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GovernancePlatform")
            .field("orchestrator", &self.orchestrator)
            .field("providers", &self.providers)
            .finish()
    }
}
