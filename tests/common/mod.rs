#![allow(dead_code)]
//! Common test utilities and mock implementations

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Barrier;

use skyspear_engine::providers::CloudProviderAdapter;
use skyspear_engine::types::{
    CloudPlatform, CloudResource, CostRecommendation, Impact, SecurityIssue, Severity,
};
use skyspear_engine::ProviderError;

/// Mock cloud provider for testing
pub struct MockProvider {
    pub platform: CloudPlatform,
    pub resources: Vec<CloudResource>,
    pub costs: Vec<CostRecommendation>,
    pub issues: Vec<SecurityIssue>,
    /// Error returned from list_resources (if any)
    pub list_error: Option<String>,
    /// Every list_resources call waits here before returning
    pub barrier: Option<Arc<Barrier>>,
    /// Every analyze_costs / analyze_security call waits here before returning
    pub analysis_barrier: Option<Arc<Barrier>>,
    /// Sleep before list_resources returns
    pub list_delay: Option<Duration>,
    /// Number of adapter calls received
    pub calls: Arc<AtomicUsize>,
    /// Shared, ordered record of call starts and ends
    pub events: Option<EventLog>,
}

/// Ordered log of adapter activity shared by several mocks
pub type EventLog = Arc<Mutex<Vec<(CloudPlatform, Event)>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    ListStarted,
    ListFinished,
    CostStarted,
    SecurityStarted,
}

impl MockProvider {
    pub fn new(platform: CloudPlatform) -> Self {
        Self {
            platform,
            resources: Vec::new(),
            costs: Vec::new(),
            issues: Vec::new(),
            list_error: None,
            barrier: None,
            analysis_barrier: None,
            list_delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            events: None,
        }
    }

    pub fn with_resources(mut self, ids: &[&str], resource_type: &str) -> Self {
        self.resources = ids
            .iter()
            .map(|id| CloudResource::new(*id, resource_type, self.platform))
            .collect();
        self
    }

    pub fn with_cost(mut self, resource_id: &str, savings: f64) -> Self {
        self.costs.push(CostRecommendation {
            resource_id: resource_id.to_string(),
            resource_type: "VM".to_string(),
            current_configuration: "large".to_string(),
            recommended_configuration: "small".to_string(),
            estimated_savings: savings,
            estimated_savings_percentage: None,
            currency: Some("USD".to_string()),
            impact: Impact::Low,
            justification: None,
        });
        self
    }

    pub fn with_issue(mut self, resource_id: &str) -> Self {
        self.issues.push(SecurityIssue {
            resource_id: resource_id.to_string(),
            resource_type: "VM".to_string(),
            severity: Severity::Critical,
            issue: "Open management port".to_string(),
            remediation: "Restrict the security group".to_string(),
            compliance: Default::default(),
            details: Default::default(),
        });
        self
    }

    pub fn with_list_error(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn with_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.barrier = Some(barrier);
        self
    }

    pub fn with_analysis_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.analysis_barrier = Some(barrier);
        self
    }

    pub fn with_list_delay(mut self, delay: Duration) -> Self {
        self.list_delay = Some(delay);
        self
    }

    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    fn record(&self, event: Event) {
        if let Some(events) = &self.events {
            events.lock().unwrap().push((self.platform, event));
        }
    }

    async fn wait_for_analysis_peers(&self) {
        if let Some(barrier) = &self.analysis_barrier {
            barrier.wait().await;
        }
    }

    pub fn into_arc(self) -> Arc<dyn CloudProviderAdapter> {
        Arc::new(self)
    }
}

#[async_trait]
impl CloudProviderAdapter for MockProvider {
    fn platform(&self) -> CloudPlatform {
        self.platform
    }

    async fn list_resources(&self) -> Result<Vec<CloudResource>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.record(Event::ListStarted);

        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.list_delay {
            tokio::time::sleep(delay).await;
        }

        self.record(Event::ListFinished);
        match &self.list_error {
            Some(message) => Err(ProviderError::request_failed(self.platform, message.clone())),
            None => Ok(self.resources.clone()),
        }
    }

    async fn analyze_costs(
        &self,
        _resources: &[CloudResource],
    ) -> Result<Vec<CostRecommendation>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.record(Event::CostStarted);
        self.wait_for_analysis_peers().await;
        Ok(self.costs.clone())
    }

    async fn analyze_security(
        &self,
        _resources: &[CloudResource],
    ) -> Result<Vec<SecurityIssue>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.record(Event::SecurityStarted);
        self.wait_for_analysis_peers().await;
        Ok(self.issues.clone())
    }
}
