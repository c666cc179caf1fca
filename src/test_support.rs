//! Scripted adapter used by the unit tests

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use crate::error::ProviderError;
use crate::providers::CloudProviderAdapter;
use crate::types::{
    CloudPlatform, CloudResource, CostRecommendation, Impact, ScanPhase, SecurityIssue, Severity,
};

/// Adapter returning canned data, optionally slowed down or failing one phase
pub(crate) struct MockAdapter {
    pub platform: CloudPlatform,
    pub resources: Vec<CloudResource>,
    pub costs: Vec<CostRecommendation>,
    pub issues: Vec<SecurityIssue>,
    pub delay: Option<Duration>,
    pub fail_on: Option<ScanPhase>,
    /// Phase and input size of every call, in call order
    pub calls: Arc<Mutex<Vec<(ScanPhase, usize)>>>,
}

impl MockAdapter {
    pub fn new(platform: CloudPlatform) -> Self {
        Self {
            platform,
            resources: Vec::new(),
            costs: Vec::new(),
            issues: Vec::new(),
            delay: None,
            fail_on: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_resources(mut self, resources: Vec<CloudResource>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_costs(mut self, costs: Vec<CostRecommendation>) -> Self {
        self.costs = costs;
        self
    }

    pub fn with_issues(mut self, issues: Vec<SecurityIssue>) -> Self {
        self.issues = issues;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing_on(mut self, phase: ScanPhase) -> Self {
        self.fail_on = Some(phase);
        self
    }

    pub fn into_arc(self) -> Arc<dyn CloudProviderAdapter> {
        Arc::new(self)
    }

    async fn enter(&self, phase: ScanPhase, input: usize) -> Result<(), ProviderError> {
        self.calls.lock().unwrap().push((phase, input));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_on == Some(phase) {
            return Err(ProviderError::request_failed(
                self.platform,
                format!("{} call rejected", phase),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl CloudProviderAdapter for MockAdapter {
    fn platform(&self) -> CloudPlatform {
        self.platform
    }

    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError> {
        self.enter(ScanPhase::Resource, 0).await?;
        Ok(self.resources.clone())
    }

    async fn analyze_costs(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError> {
        self.enter(ScanPhase::Cost, resources.len()).await?;
        Ok(self.costs.clone())
    }

    async fn analyze_security(
        &self,
        resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError> {
        self.enter(ScanPhase::Security, resources.len()).await?;
        Ok(self.issues.clone())
    }
}

pub(crate) fn cost(resource_id: &str, savings: f64) -> CostRecommendation {
    CostRecommendation {
        resource_id: resource_id.to_string(),
        resource_type: "EC2 Instance".to_string(),
        current_configuration: "t3.micro".to_string(),
        recommended_configuration: "t4g.micro".to_string(),
        estimated_savings: savings,
        estimated_savings_percentage: None,
        currency: None,
        impact: Impact::Medium,
        justification: None,
    }
}

pub(crate) fn issue(resource_id: &str) -> SecurityIssue {
    SecurityIssue {
        resource_id: resource_id.to_string(),
        resource_type: "S3 Bucket".to_string(),
        severity: Severity::High,
        issue: "S3 bucket has public access enabled".to_string(),
        remediation: "Update bucket ACL to remove public access grants".to_string(),
        compliance: BTreeSet::new(),
        details: BTreeMap::new(),
    }
}
