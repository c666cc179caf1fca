//! AWS Provider - EC2 instances and S3 buckets

use async_trait::async_trait;
use tracing::info;

use super::inventory::{InventoryItem, PostureIndex};
use super::rules::{RightsizingRule, SecurityRule};
use super::CloudProviderAdapter;
use crate::error::ProviderError;
use crate::types::{CloudPlatform, CloudResource, CostRecommendation, Impact, SecurityIssue, Severity};

/// Region assumed when neither the credentials nor the resource name one
pub const DEFAULT_REGION: &str = "us-east-1";

/// Inventory type of S3 buckets
pub const S3_BUCKET_TYPE: &str = "s3-bucket";

const GRAVITON_RIGHTSIZING: RightsizingRule = RightsizingRule {
    resource_label: "EC2 Instance",
    from: "t3.micro",
    to: "t4g.micro",
    monthly_savings: 20.0,
    impact: Impact::Medium,
    justification: "Switch to ARM-based instance for better price-performance",
};

const PUBLIC_BUCKET: SecurityRule = SecurityRule {
    resource_label: "S3 Bucket",
    severity: Severity::High,
    issue: "S3 bucket has public access enabled",
    remediation: "Update bucket ACL to remove public access grants",
    compliance: &["CIS AWS 1.2", "SOC2", "PCI DSS 3.2.1"],
};

/// AWS adapter backed by an inventory snapshot
pub struct AwsProvider {
    region: String,
    items: Vec<InventoryItem>,
}

impl AwsProvider {
    pub fn new(region: Option<String>, items: Vec<InventoryItem>) -> Self {
        Self {
            region: region.unwrap_or_else(|| DEFAULT_REGION.to_string()),
            items,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl CloudProviderAdapter for AwsProvider {
    fn platform(&self) -> CloudPlatform {
        CloudPlatform::Aws
    }

    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError> {
        let resources: Vec<CloudResource> = self
            .items
            .iter()
            .map(|item| {
                let mut resource = item.resource.clone();
                if resource.region.is_none() {
                    resource.region = Some(self.region.clone());
                }
                resource
            })
            .collect();

        info!(region = %self.region, count = resources.len(), "Found AWS resources");
        Ok(resources)
    }

    async fn analyze_costs(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError> {
        info!("Analyzing {} AWS resources for cost optimization", resources.len());

        Ok(resources
            .iter()
            .filter_map(|resource| GRAVITON_RIGHTSIZING.apply(resource))
            .collect())
    }

    async fn analyze_security(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError> {
        let postures = PostureIndex::new(&self.items);

        let issues: Vec<SecurityIssue> = resources
            .iter()
            .filter(|r| r.resource_type == S3_BUCKET_TYPE && postures.posture_of(&r.id).public_access)
            .map(|r| PUBLIC_BUCKET.issue_for(r))
            .collect();

        info!("Found {} AWS security issues", issues.len());
        Ok(issues)
    }
}
