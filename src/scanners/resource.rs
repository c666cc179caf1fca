//! Resource discovery phase

use tracing::info;

use super::{fan_out, FailurePolicy, PhaseOutput};
use crate::error::{PhaseError, ProviderError};
use crate::providers::ConnectedProviders;
use crate::types::{CloudPlatform, CloudResource, ScanPhase};

/// Lists the resources of every connected provider
pub struct ResourceScanner<'a> {
    providers: &'a ConnectedProviders,
    policy: FailurePolicy,
}

impl<'a> ResourceScanner<'a> {
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

    /// All resources, aws first, then azure, then gcp
    pub async fn scan(&self) -> Result<PhaseOutput<CloudResource>, PhaseError> {
        let output = fan_out(self.providers, ScanPhase::Resource, self.policy, |adapter| async move {
            let resources = adapter.list_resources().await?;
            check_platform(adapter.platform(), &resources)?;
            Ok::<_, ProviderError>(resources)
        })
        .await?;

        info!(resources = output.items.len(), "Resource scan complete");
        Ok(output)
    }
}

/// An adapter may only report resources of its own platform
fn check_platform(platform: CloudPlatform, resources: &[CloudResource]) -> Result<(), ProviderError> {
    match resources.iter().find(|r| r.platform != platform) {
        Some(stray) => Err(ProviderError::invalid_response(
            platform,
            format!("resource {} reported as {}", stray.id, stray.platform),
        )),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockAdapter;
    use std::time::Duration;

    fn resources(platform: CloudPlatform, ids: &[&str]) -> Vec<CloudResource> {
        ids.iter()
            .map(|id| CloudResource::new(*id, "vm", platform))
            .collect()
    }

    #[tokio::test]
    async fn test_results_follow_platform_order_not_completion_order() {
        let providers = ConnectedProviders::none()
            .with(
                MockAdapter::new(CloudPlatform::Aws)
                    .with_resources(resources(CloudPlatform::Aws, &["a1", "a2"]))
                    .with_delay(Duration::from_millis(40))
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Azure)
                    .with_resources(resources(CloudPlatform::Azure, &["z1"]))
                    .with_delay(Duration::from_millis(20))
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Gcp)
                    .with_resources(resources(CloudPlatform::Gcp, &["g1"]))
                    .into_arc(),
            );

        let output = ResourceScanner::new(&providers).scan().await.unwrap();

        let ids: Vec<&str> = output.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "z1", "g1"]);
        assert!(output.failures.is_empty());
    }

    #[tokio::test]
    async fn test_no_providers_yields_empty_scan() {
        let providers = ConnectedProviders::none();

        let output = ResourceScanner::new(&providers).scan().await.unwrap();

        assert!(output.items.is_empty());
    }

    #[tokio::test]
    async fn test_fail_fast_fails_the_phase() {
        let providers = ConnectedProviders::none()
            .with(
                MockAdapter::new(CloudPlatform::Aws)
                    .with_resources(resources(CloudPlatform::Aws, &["a1"]))
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Azure)
                    .failing_on(ScanPhase::Resource)
                    .into_arc(),
            );

        let err = ResourceScanner::new(&providers).scan().await.unwrap_err();

        assert_eq!(err.phase, ScanPhase::Resource);
        assert_eq!(err.source.platform(), CloudPlatform::Azure);
    }

    #[tokio::test]
    async fn test_isolate_keeps_surviving_providers() {
        let providers = ConnectedProviders::none()
            .with(
                MockAdapter::new(CloudPlatform::Aws)
                    .failing_on(ScanPhase::Resource)
                    .into_arc(),
            )
            .with(
                MockAdapter::new(CloudPlatform::Gcp)
                    .with_resources(resources(CloudPlatform::Gcp, &["g1"]))
                    .into_arc(),
            );

        let output = ResourceScanner::new(&providers)
            .with_policy(FailurePolicy::Isolate)
            .scan()
            .await
            .unwrap();

        assert_eq!(output.items.len(), 1);
        assert_eq!(output.failures.len(), 1);
        assert_eq!(output.failures[0].platform, CloudPlatform::Aws);
        assert_eq!(output.failures[0].phase, ScanPhase::Resource);
    }

    #[tokio::test]
    async fn test_foreign_platform_resource_is_rejected() {
        let providers = ConnectedProviders::none().with(
            MockAdapter::new(CloudPlatform::Aws)
                .with_resources(resources(CloudPlatform::Gcp, &["g1"]))
                .into_arc(),
        );

        let err = ResourceScanner::new(&providers).scan().await.unwrap_err();

        assert!(matches!(err.source, ProviderError::InvalidResponse { .. }));
        assert!(err.to_string().contains("resource g1 reported as gcp"));
    }
}
