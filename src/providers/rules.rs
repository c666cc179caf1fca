//! Rule definitions shared by the built-in adapters

use std::collections::{BTreeMap, BTreeSet};

use crate::types::{CloudResource, CostRecommendation, Impact, SecurityIssue, Severity};

/// Currency of every built-in savings estimate
pub(crate) const DEFAULT_CURRENCY: &str = "USD";

/// Instance-size downgrade: fires for every resource of type `from`
pub(crate) struct RightsizingRule {
    pub resource_label: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    pub monthly_savings: f64,
    pub impact: Impact,
    pub justification: &'static str,
}

impl RightsizingRule {
    pub(crate) fn apply(&self, resource: &CloudResource) -> Option<CostRecommendation> {
        if resource.resource_type != self.from {
            return None;
        }

        Some(CostRecommendation {
            resource_id: resource.id.clone(),
            resource_type: self.resource_label.to_string(),
            current_configuration: self.from.to_string(),
            recommended_configuration: self.to.to_string(),
            estimated_savings: self.monthly_savings,
            estimated_savings_percentage: None,
            currency: Some(DEFAULT_CURRENCY.to_string()),
            impact: self.impact,
            justification: Some(self.justification.to_string()),
        })
    }
}

/// Text and classification of a security finding
pub(crate) struct SecurityRule {
    pub resource_label: &'static str,
    pub severity: Severity,
    pub issue: &'static str,
    pub remediation: &'static str,
    pub compliance: &'static [&'static str],
}

impl SecurityRule {
    pub(crate) fn issue_for(&self, resource: &CloudResource) -> SecurityIssue {
        let mut details = BTreeMap::new();
        if let Some(region) = resource.region.as_ref().or(resource.zone.as_ref()) {
            details.insert("location".to_string(), serde_json::json!(region));
        }

        SecurityIssue {
            resource_id: resource.id.clone(),
            resource_type: self.resource_label.to_string(),
            severity: self.severity,
            issue: self.issue.to_string(),
            remediation: self.remediation.to_string(),
            compliance: self.compliance.iter().map(|c| c.to_string()).collect::<BTreeSet<_>>(),
            details,
        }
    }
}
