//! Cost analysis phase

use tracing::info;

use super::{fan_out, FailurePolicy, PhaseOutput, PlatformPartition};
use crate::error::{PhaseError, ProviderError};
use crate::providers::ConnectedProviders;
use crate::types::{CloudPlatform, CloudResource, CostRecommendation, ScanPhase};

/// Asks every connected provider for cost recommendations on its share of
/// the discovered resources
pub struct CostScanner<'a> {
    providers: &'a ConnectedProviders,
    policy: FailurePolicy,
}

impl<'a> CostScanner<'a> {
    pub fn new(providers: &'a ConnectedProviders) -> Self {
        Self {
            providers,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Every connected adapter is consulted, even when none of `resources`
    /// belongs to it.
    pub async fn scan(
        &self,
        resources: &[CloudResource],
    ) -> Result<PhaseOutput<CostRecommendation>, PhaseError> {
        let partition = PlatformPartition::new(resources);
        let partition = &partition;

        let output = fan_out(self.providers, ScanPhase::Cost, self.policy, |adapter| async move {
            let platform = adapter.platform();
            let costs = adapter
                .analyze_costs(partition.resources_for(platform))
                .await?;
            check_savings(platform, &costs)?;
            Ok::<_, ProviderError>(costs)
        })
        .await?;

        info!(recommendations = output.items.len(), "Cost scan complete");
        Ok(output)
    }
}

fn check_savings(platform: CloudPlatform, costs: &[CostRecommendation]) -> Result<(), ProviderError> {
    let invalid = costs
        .iter()
        .find(|c| !c.estimated_savings.is_finite() || c.estimated_savings < 0.0);

    match invalid {
        Some(c) => Err(ProviderError::invalid_response(
            platform,
            format!(
                "recommendation for {} has invalid estimated savings {}",
                c.resource_id, c.estimated_savings
            ),
        )),
        None => Ok(()),
    }
}
