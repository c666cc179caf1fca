//! Scan Engine Types
//!
//! Core types for representing discovered cloud resources, cost and security
//! findings, and the report produced by a scan.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Priority attached to cost findings in the merged optimization list
pub const COST_PRIORITY: u8 = 3;

/// Priority attached to security findings in the merged optimization list
pub const SECURITY_PRIORITY: u8 = 4;

/// Cloud platform identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CloudPlatform {
    Aws,
    Azure,
    Gcp,
}

impl CloudPlatform {
    /// Every platform, in the order scan results are concatenated.
    pub const ALL: [CloudPlatform; 3] = [CloudPlatform::Aws, CloudPlatform::Azure, CloudPlatform::Gcp];

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudPlatform::Aws => "aws",
            CloudPlatform::Azure => "azure",
            CloudPlatform::Gcp => "gcp",
        }
    }
}

impl std::fmt::Display for CloudPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource discovered on one cloud platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudResource {
    /// Platform-unique identifier (instance id, ARM id, self link, ...)
    pub id: String,
    /// Human readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Platform-specific SKU or class (e.g. "t3.micro", "Standard_D2s_v3")
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Platform that reported the resource
    pub platform: CloudPlatform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<String>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CloudResource {
    pub fn new(id: impl Into<String>, resource_type: impl Into<String>, platform: CloudPlatform) -> Self {
        Self {
            id: id.into(),
            name: None,
            resource_type: resource_type.into(),
            platform,
            region: None,
            zone: None,
            resource_group: None,
            tags: BTreeMap::new(),
            created_at: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn in_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    pub fn in_resource_group(mut self, group: impl Into<String>) -> Self {
        self.resource_group = Some(group.into());
        self
    }

    /// Add a tag. A repeated key overwrites the previous value.
    pub fn tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

/// Expected impact of applying a cost recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    High,
    Medium,
    Low,
}

/// Severity of a security issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Cost optimization recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostRecommendation {
    /// Resource the recommendation applies to. Not enforced to exist in the scan.
    pub resource_id: String,
    pub resource_type: String,
    pub current_configuration: String,
    pub recommended_configuration: String,
    /// Estimated monthly savings, never negative
    pub estimated_savings: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_savings_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub impact: Impact,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
}

/// Security or compliance issue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityIssue {
    pub resource_id: String,
    pub resource_type: String,
    pub severity: Severity,
    pub issue: String,
    pub remediation: String,
    /// Compliance frameworks the issue violates
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub compliance: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub details: BTreeMap<String, serde_json::Value>,
}

/// A finding in the merged optimization list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Finding {
    Cost(CostRecommendation),
    Security(SecurityIssue),
}

impl Finding {
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::Cost(_) => "cost",
            Finding::Security(_) => "security",
        }
    }

    pub fn resource_id(&self) -> &str {
        match self {
            Finding::Cost(c) => &c.resource_id,
            Finding::Security(s) => &s.resource_id,
        }
    }
}

/// Prioritized entry of [`ScanResults::optimization`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Optimization {
    #[serde(flatten)]
    pub finding: Finding,
    pub priority: u8,
}

impl Optimization {
    pub fn cost(recommendation: CostRecommendation) -> Self {
        Self {
            finding: Finding::Cost(recommendation),
            priority: COST_PRIORITY,
        }
    }

    pub fn security(issue: SecurityIssue) -> Self {
        Self {
            finding: Finding::Security(issue),
            priority: SECURITY_PRIORITY,
        }
    }
}

/// One of the three scan phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanPhase {
    Resource,
    Cost,
    Security,
}

impl std::fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanPhase::Resource => write!(f, "resource"),
            ScanPhase::Cost => write!(f, "cost"),
            ScanPhase::Security => write!(f, "security"),
        }
    }
}

/// Final status of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    Completed,
    Partial,
    Failed,
}

/// A provider call that failed without failing its phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFailure {
    pub platform: CloudPlatform,
    pub phase: ScanPhase,
    pub message: String,
}

/// Timing and status of a finished scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanMetadata {
    pub scan_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Milliseconds between `start_time` and `end_time`
    pub duration: u64,
    pub resource_count: usize,
    pub status: ScanStatus,
}

/// Provisional metadata of a scan in flight.
///
/// [`PendingScan::finish`] consumes the value, so the metadata of a scan is
/// finalized exactly once.
#[derive(Debug)]
pub struct PendingScan {
    scan_id: Uuid,
    start_time: DateTime<Utc>,
    started: Instant,
}

impl PendingScan {
    /// Record the start time and allocate a fresh scan id
    pub fn start() -> Self {
        Self {
            scan_id: Uuid::new_v4(),
            start_time: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn scan_id(&self) -> Uuid {
        self.scan_id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    /// Stamp the end time and produce the final metadata.
    ///
    /// The end time is derived from a monotonic clock so that
    /// `end_time - start_time == duration` holds even if the wall clock jumps.
    pub fn finish(self, status: ScanStatus, resource_count: usize) -> ScanMetadata {
        let duration = self.started.elapsed().as_millis() as u64;
        let end_time = self.start_time + chrono::Duration::milliseconds(duration as i64);

        ScanMetadata {
            scan_id: self.scan_id,
            start_time: self.start_time,
            end_time,
            duration,
            resource_count,
            status,
        }
    }
}

/// Options accepted by a scan run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanOptions {
    pub include_resources: bool,
    pub include_costs: bool,
    pub include_security: bool,
    /// Region filter. Advisory only: every region is still scanned.
    pub regions: Vec<String>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            include_resources: true,
            include_costs: true,
            include_security: true,
            regions: Vec::new(),
        }
    }
}

/// Report of a successful (possibly partial) scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResults {
    pub resources: Vec<CloudResource>,
    pub costs: Vec<CostRecommendation>,
    pub security: Vec<SecurityIssue>,
    /// Cost findings followed by security findings, each tagged with its priority
    pub optimization: Vec<Optimization>,
    /// Provider calls that failed under the isolate failure policy
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ProviderFailure>,
    pub metadata: ScanMetadata,
}
