//! Scan Orchestrator
//!
//! Runs one scan against a snapshot of connected providers: resources first,
//! then cost and security analysis side by side, then the merged
//! optimization list.

use tracing::{debug, error, info};

use crate::config::EngineConfig;
use crate::error::{PhaseError, ScanError};
use crate::providers::ConnectedProviders;
use crate::scanners::{CostScanner, PhaseOutput, ResourceScanner, SecurityScanner};
use crate::types::{
    CostRecommendation, Optimization, PendingScan, ScanMetadata, ScanOptions, ScanResults,
    ScanStatus, SecurityIssue,
};

/// Result of a scan that always carries the finalized metadata
#[derive(Debug, Clone)]
pub enum ScanOutcome {
    Succeeded(ScanResults),
    Failed {
        metadata: ScanMetadata,
        error: ScanError,
    },
}

impl ScanOutcome {
    pub fn metadata(&self) -> &ScanMetadata {
        match self {
            ScanOutcome::Succeeded(results) => &results.metadata,
            ScanOutcome::Failed { metadata, .. } => metadata,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Succeeded(_))
    }

    /// Drop the metadata of a failed scan and keep only its error
    pub fn into_result(self) -> Result<ScanResults, ScanError> {
        match self {
            ScanOutcome::Succeeded(results) => Ok(results),
            ScanOutcome::Failed { error, .. } => Err(error),
        }
    }
}

/// Cost findings (priority 3) followed by security findings (priority 4),
/// each in scanner order
pub fn merge_findings(costs: &[CostRecommendation], security: &[SecurityIssue]) -> Vec<Optimization> {
    costs
        .iter()
        .cloned()
        .map(Optimization::cost)
        .chain(security.iter().cloned().map(Optimization::security))
        .collect()
}

/// Scan Orchestrator
///
/// Holds configuration only. The providers to scan are passed into every
/// run, so concurrent scans never share mutable state.
#[derive(Debug, Clone, Default)]
pub struct ScanOrchestrator {
    config: EngineConfig,
}

impl ScanOrchestrator {
    pub fn new(config: EngineConfig) -> Self {
        info!(
            cost = config.cost_optimization_enabled,
            security = config.security_enabled,
            failure_policy = %config.failure_policy,
            "ScanOrchestrator initialized"
        );
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a scan; on failure only the error is returned.
    ///
    /// The metadata of a failed scan is discarded: the caller gets the
    /// [`ScanError`], which still carries the scan id. Use
    /// [`run_scan_report`](Self::run_scan_report) to keep timing and counts.
    pub async fn run_scan(
        &self,
        providers: &ConnectedProviders,
        options: &ScanOptions,
    ) -> Result<ScanResults, ScanError> {
        self.run_scan_report(providers, options).await.into_result()
    }

    /// Run a scan and report its outcome together with its metadata.
    ///
    /// Never fails: a failed scan comes back as [`ScanOutcome::Failed`] with
    /// finalized metadata (status `failed`, end time, duration and the number
    /// of resources discovered before the failure).
    pub async fn run_scan_report(
        &self,
        providers: &ConnectedProviders,
        options: &ScanOptions,
    ) -> ScanOutcome {
        let pending = PendingScan::start();
        let scan_id = pending.scan_id();
        let policy = self.config.failure_policy;

        info!(scan_id = %scan_id, providers = ?providers.platforms(), "Starting scan");

        if !options.regions.is_empty() {
            debug!(scan_id = %scan_id, regions = ?options.regions, "Region filter is advisory, scanning all regions");
        }

        let mut failures = Vec::new();

        let resources = if options.include_resources {
            match ResourceScanner::new(providers).with_policy(policy).scan().await {
                Ok(output) => {
                    failures.extend(output.failures);
                    output.items
                }
                Err(e) => return Self::fail(pending, 0, e),
            }
        } else {
            Vec::new()
        };

        let run_costs = options.include_costs && self.config.cost_optimization_enabled;
        let run_security = options.include_security && self.config.security_enabled;

        let cost_phase = async {
            if run_costs {
                CostScanner::new(providers).with_policy(policy).scan(&resources).await
            } else {
                Ok(PhaseOutput::default())
            }
        };
        let security_phase = async {
            if run_security {
                SecurityScanner::new(providers).with_policy(policy).scan(&resources).await
            } else {
                Ok(PhaseOutput::default())
            }
        };

        let (costs, security) = match tokio::try_join!(cost_phase, security_phase) {
            Ok(phases) => phases,
            Err(e) => return Self::fail(pending, resources.len(), e),
        };

        failures.extend(costs.failures);
        failures.extend(security.failures);

        let status = if failures.is_empty() {
            ScanStatus::Completed
        } else {
            ScanStatus::Partial
        };
        let optimization = merge_findings(&costs.items, &security.items);
        let metadata = pending.finish(status, resources.len());

        info!(
            scan_id = %scan_id,
            resources = resources.len(),
            costs = costs.items.len(),
            security = security.items.len(),
            failures = failures.len(),
            duration_ms = metadata.duration,
            "Scan finished"
        );

        ScanOutcome::Succeeded(ScanResults {
            resources,
            costs: costs.items,
            security: security.items,
            optimization,
            failures,
            metadata,
        })
    }

    fn fail(pending: PendingScan, resource_count: usize, source: PhaseError) -> ScanOutcome {
        let metadata = pending.finish(ScanStatus::Failed, resource_count);

        error!(
            scan_id = %metadata.scan_id,
            phase = %source.phase,
            error = %source,
            "Scan failed"
        );

        ScanOutcome::Failed {
            error: ScanError {
                scan_id: metadata.scan_id,
                source,
            },
            metadata,
        }
    }
}
