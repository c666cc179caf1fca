//! Azure Provider - virtual machines

use async_trait::async_trait;
use tracing::info;

use super::inventory::{InventoryItem, PostureIndex, ResourceKind};
use super::rules::{RightsizingRule, SecurityRule};
use super::CloudProviderAdapter;
use crate::error::ProviderError;
use crate::types::{CloudPlatform, CloudResource, CostRecommendation, Impact, SecurityIssue, Severity};

/// ARM id segment of Compute virtual machines, lowercased
const VM_ID_SEGMENT: &str = "/providers/microsoft.compute/virtualmachines/";

const BURSTABLE_RIGHTSIZING: RightsizingRule = RightsizingRule {
    resource_label: "Azure VM",
    from: "Standard_D2s_v3",
    to: "Standard_B2s",
    monthly_savings: 40.0,
    impact: Impact::High,
    justification: "Switch to burstable instance for better cost efficiency",
};

const UNENCRYPTED_DISK: SecurityRule = SecurityRule {
    resource_label: "Azure VM",
    severity: Severity::Medium,
    issue: "Disk encryption not enabled",
    remediation: "Enable Azure Disk Encryption for virtual machines",
    compliance: &["Azure Security Benchmark", "CIS Azure"],
};

/// Azure adapter backed by an inventory snapshot
pub struct AzureProvider {
    subscription_id: String,
    items: Vec<InventoryItem>,
}

impl AzureProvider {
    pub fn new(subscription_id: &str, items: Vec<InventoryItem>) -> Self {
        Self {
            subscription_id: subscription_id.to_string(),
            items,
        }
    }

    pub fn subscription_id(&self) -> &str {
        &self.subscription_id
    }
}

#[async_trait]
impl CloudProviderAdapter for AzureProvider {
    fn platform(&self) -> CloudPlatform {
        CloudPlatform::Azure
    }

    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError> {
        let resources: Vec<CloudResource> =
            self.items.iter().map(|item| item.resource.clone()).collect();

        info!(
            subscription = %self.subscription_id,
            count = resources.len(),
            "Found Azure resources"
        );
        Ok(resources)
    }

    async fn analyze_costs(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError> {
        info!("Analyzing {} Azure resources for cost optimization", resources.len());

        Ok(resources
            .iter()
            .filter_map(|resource| BURSTABLE_RIGHTSIZING.apply(resource))
            .collect())
    }

    async fn analyze_security(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError> {
        let postures = PostureIndex::new(&self.items);

        let issues: Vec<SecurityIssue> = resources
            .iter()
            .filter(|r| is_virtual_machine(r, &postures))
            .filter(|r| !postures.posture_of(&r.id).disk_encryption)
            .map(|r| UNENCRYPTED_DISK.issue_for(r))
            .collect();

        info!("Found {} Azure security issues", issues.len());
        Ok(issues)
    }
}

/// A declared kind wins; otherwise fall back to the ARM resource id.
/// SKU names are ambiguous ("Standard_LRS" is a storage SKU).
fn is_virtual_machine(resource: &CloudResource, postures: &PostureIndex<'_>) -> bool {
    match postures.kind_of(&resource.id) {
        Some(kind) => kind == ResourceKind::VirtualMachine,
        None => resource.id.to_ascii_lowercase().contains(VM_ID_SEGMENT),
    }
}
