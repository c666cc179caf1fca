//! Security analysis phase

use tracing::info;

use super::{fan_out, FailurePolicy, PhaseOutput, PlatformPartition};
use crate::error::{PhaseError, ProviderError};
use crate::providers::ConnectedProviders;
use crate::types::{CloudResource, ScanPhase, SecurityIssue};

/// Asks every connected provider for security issues on its share of the
/// discovered resources
pub struct SecurityScanner<'a> {
    providers: &'a ConnectedProviders,
    policy: FailurePolicy,
}

impl<'a> SecurityScanner<'a> {
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

    pub async fn scan(
        &self,
        resources: &[CloudResource],
    ) -> Result<PhaseOutput<SecurityIssue>, PhaseError> {
        let partition = PlatformPartition::new(resources);
        let partition = &partition;

        let output = fan_out(self.providers, ScanPhase::Security, self.policy, |adapter| async move {
            let issues = adapter
                .analyze_security(partition.resources_for(adapter.platform()))
                .await?;
            Ok::<_, ProviderError>(issues)
        })
        .await?;

        info!(issues = output.items.len(), "Security scan complete");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{issue, MockAdapter};
    use crate::types::CloudPlatform;
    use std::time::Duration;

    #[tokio::test]
    async fn test_issues_concatenate_in_platform_order() {
        let providers = ConnectedProviders::none()
            .with(
                MockAdapter::new(CloudPlatform::Gcp)
                    .with_issues(vec![issue("g1")])
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Aws)
                    .with_issues(vec![issue("a1"), issue("a2")])
                    .with_delay(Duration::from_millis(30))
                    .into_arc(),
            );

        let output = SecurityScanner::new(&providers).scan(&[]).await.unwrap();

        let ids: Vec<&str> = output.items.iter().map(|i| i.resource_id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "g1"]);
    }

    #[tokio::test]
    async fn test_adapter_failure_fails_the_phase() {
        let providers = ConnectedProviders::none()
            .with(
                MockAdapter::new(CloudPlatform::Aws)
                    .with_issues(vec![issue("a1")])
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Gcp)
                    .failing_on(ScanPhase::Security)
                    .into_arc(),
            );

        let err = SecurityScanner::new(&providers).scan(&[]).await.unwrap_err();

        assert_eq!(err.phase, ScanPhase::Security);
        assert_eq!(err.source.platform(), CloudPlatform::Gcp);
    }
}
