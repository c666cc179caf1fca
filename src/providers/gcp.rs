//! GCP Provider - Compute Engine instances

use async_trait::async_trait;
use tracing::info;

use super::inventory::{InventoryItem, PostureIndex};
use super::rules::{RightsizingRule, SecurityRule};
use super::CloudProviderAdapter;
use crate::error::ProviderError;
use crate::types::{CloudPlatform, CloudResource, CostRecommendation, Impact, SecurityIssue, Severity};

const E2_RIGHTSIZING: RightsizingRule = RightsizingRule {
    resource_label: "GCP VM Instance",
    from: "n1-standard-1",
    to: "e2-standard-1",
    monthly_savings: 30.0,
    impact: Impact::Medium,
    justification: "Switch to E2 instance for better pricing",
};

const PUBLIC_IP: SecurityRule = SecurityRule {
    resource_label: "GCP VM Instance",
    severity: Severity::Medium,
    issue: "Instance has public IP address",
    remediation: "Configure the instance to use only private IP addresses and set up NAT gateway for internet access",
    compliance: &["CIS GCP", "NIST"],
};

/// GCP adapter backed by an inventory snapshot
pub struct GcpProvider {
    project_id: String,
    items: Vec<InventoryItem>,
}

impl GcpProvider {
    pub fn new(project_id: &str, items: Vec<InventoryItem>) -> Self {
        Self {
            project_id: project_id.to_string(),
            items,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

#[async_trait]
impl CloudProviderAdapter for GcpProvider {
    fn platform(&self) -> CloudPlatform {
        CloudPlatform::Gcp
    }

    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError> {
        let resources: Vec<CloudResource> =
            self.items.iter().map(|item| item.resource.clone()).collect();

        info!(project = %self.project_id, count = resources.len(), "Found GCP resources");
        Ok(resources)
    }

    async fn analyze_costs(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError> {
        info!("Analyzing {} GCP resources for cost optimization", resources.len());

        Ok(resources
            .iter()
            .filter_map(|resource| E2_RIGHTSIZING.apply(resource))
            .collect())
    }

    async fn analyze_security(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError> {
        let postures = PostureIndex::new(&self.items);

        let issues: Vec<SecurityIssue> = resources
            .iter()
            .filter(|r| postures.posture_of(&r.id).public_ip)
            .map(|r| PUBLIC_IP.issue_for(r))
            .collect();

        info!("Found {} GCP security issues", issues.len());
        Ok(issues)
    }
}
