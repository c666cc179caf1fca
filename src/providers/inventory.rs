//! Declarative resource inventory backing the built-in adapters
//!
//! An inventory is a JSON array of resources, each optionally carrying the
//! security-relevant configuration the platform rules inspect:
//!
//! ```json
//! [
//!   { "id": "i-12345678", "type": "t3.micro", "platform": "aws", "region": "us-east-1" },
//!   { "id": "logs", "type": "s3-bucket", "platform": "aws", "posture": { "publicAccess": true } },
//!   { "id": "vm-1", "type": "Standard_D2s_v3", "platform": "azure", "kind": "virtual-machine" }
//! ]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::types::{CloudPlatform, CloudResource};

/// Security-relevant configuration of a resource
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SecurityPosture {
    /// Storage is readable without authentication
    pub public_access: bool,
    /// Attached disks are encrypted at rest
    pub disk_encryption: bool,
    /// Instance has an external IP address
    pub public_ip: bool,
}

/// What a resource is, independent of its SKU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    VirtualMachine,
    Storage,
    Network,
    Other,
}

/// A resource together with its security posture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(flatten)]
    pub resource: CloudResource,
    /// Unset when the inventory does not say
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,
    #[serde(default)]
    pub posture: SecurityPosture,
}

impl InventoryItem {
    pub fn new(resource: CloudResource) -> Self {
        Self {
            resource,
            kind: None,
            posture: SecurityPosture::default(),
        }
    }

    pub fn with_kind(mut self, kind: ResourceKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_posture(mut self, posture: SecurityPosture) -> Self {
        self.posture = posture;
        self
    }
}

impl From<CloudResource> for InventoryItem {
    fn from(resource: CloudResource) -> Self {
        Self::new(resource)
    }
}

/// Errors raised while loading an inventory snapshot
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Failed to read inventory {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse inventory {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Inventory snapshot covering any number of platforms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceInventory {
    items: Vec<InventoryItem>,
}

impl ResourceInventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    /// Load an inventory snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, InventoryError> {
        let raw = std::fs::read_to_string(path).map_err(|source| InventoryError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let inventory: Self = serde_json::from_str(&raw).map_err(|source| InventoryError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(path = ?path, items = inventory.len(), "Loaded resource inventory");
        Ok(inventory)
    }

    pub fn push(&mut self, item: impl Into<InventoryItem>) {
        self.items.push(item.into());
    }

    /// Items belonging to one platform, in inventory order
    pub fn for_platform(&self, platform: CloudPlatform) -> Vec<InventoryItem> {
        self.items
            .iter()
            .filter(|item| item.resource.platform == platform)
            .cloned()
            .collect()
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Lookup of inventory metadata by resource id
pub(crate) struct PostureIndex<'a> {
    by_id: HashMap<&'a str, &'a InventoryItem>,
}

impl<'a> PostureIndex<'a> {
    pub(crate) fn new(items: &'a [InventoryItem]) -> Self {
        Self {
            by_id: items
                .iter()
                .map(|item| (item.resource.id.as_str(), item))
                .collect(),
        }
    }

    /// Posture of a resource. Unknown resources get the default posture.
    pub(crate) fn posture_of(&self, resource_id: &str) -> SecurityPosture {
        self.by_id
            .get(resource_id)
            .map(|item| item.posture.clone())
            .unwrap_or_default()
    }

    pub(crate) fn kind_of(&self, resource_id: &str) -> Option<ResourceKind> {
        self.by_id.get(resource_id).and_then(|item| item.kind)
    }
}
