//! Cloud provider credential bundles
//!
//! The engine only looks at whether a bundle is present. Field validation is
//! left to the [`ProviderFactory`](super::ProviderFactory) that consumes it.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::CloudPlatform;

const REDACTED: &str = "***";

/// AWS access key pair
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsCredentials {
    pub access_key: String,
    pub secret_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &REDACTED)
            .field("region", &self.region)
            .finish()
    }
}

/// Azure service principal
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureCredentials {
    pub subscription_id: String,
    pub tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
}

impl std::fmt::Debug for AzureCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCredentials")
            .field("subscription_id", &self.subscription_id)
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// GCP project and key material
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpCredentials {
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file_path: Option<PathBuf>,
    /// Inline service account key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<serde_json::Value>,
}

impl std::fmt::Debug for GcpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GcpCredentials")
            .field("project_id", &self.project_id)
            .field("key_file_path", &self.key_file_path)
            .field("credentials", &self.credentials.as_ref().map(|_| REDACTED))
            .finish()
    }
}

/// Credentials for zero or more platforms
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azure: Option<AzureCredentials>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gcp: Option<GcpCredentials>,
}

impl CloudCredentials {
    /// Read credentials from the conventional provider environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build credentials from an arbitrary key lookup.
    ///
    /// A platform's bundle is present as soon as one of its identifying
    /// variables is set; missing required fields are left empty so the
    /// factory can reject them with a platform-specific error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let aws = match (var("AWS_ACCESS_KEY_ID"), var("AWS_SECRET_ACCESS_KEY")) {
            (None, None) => None,
            (access_key, secret_key) => Some(AwsCredentials {
                access_key: access_key.unwrap_or_default(),
                secret_key: secret_key.unwrap_or_default(),
                region: var("AWS_REGION").or_else(|| var("AWS_DEFAULT_REGION")),
            }),
        };

        let azure = match (var("AZURE_SUBSCRIPTION_ID"), var("AZURE_TENANT_ID")) {
            (None, None) => None,
            (subscription_id, tenant_id) => Some(AzureCredentials {
                subscription_id: subscription_id.unwrap_or_default(),
                tenant_id: tenant_id.unwrap_or_default(),
                client_id: var("AZURE_CLIENT_ID"),
                client_secret: var("AZURE_CLIENT_SECRET"),
            }),
        };

        let gcp = match (var("GOOGLE_CLOUD_PROJECT"), var("GOOGLE_APPLICATION_CREDENTIALS")) {
            (None, None) => None,
            (project_id, key_file) => Some(GcpCredentials {
                project_id: project_id.unwrap_or_default(),
                key_file_path: key_file.map(PathBuf::from),
                credentials: None,
            }),
        };

        Self { aws, azure, gcp }
    }

    /// Platforms with a credential bundle, in platform order
    pub fn platforms(&self) -> Vec<CloudPlatform> {
        let mut platforms = Vec::new();
        if self.aws.is_some() {
            platforms.push(CloudPlatform::Aws);
        }
        if self.azure.is_some() {
            platforms.push(CloudPlatform::Azure);
        }
        if self.gcp.is_some() {
            platforms.push(CloudPlatform::Gcp);
        }
        platforms
    }

    pub fn is_empty(&self) -> bool {
        self.aws.is_none() && self.azure.is_none() && self.gcp.is_none()
    }
}
