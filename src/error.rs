//! Error types for provider connection, adapter calls and scans

use thiserror::Error;
use uuid::Uuid;

use crate::types::{CloudPlatform, ScanPhase};

/// Errors returned by a single provider adapter call
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    /// The provider API call failed
    #[error("{platform} request failed: {message}")]
    RequestFailed {
        platform: CloudPlatform,
        message: String,
    },

    /// The adapter returned data that violates the capability contract
    #[error("{platform} returned invalid data: {message}")]
    InvalidResponse {
        platform: CloudPlatform,
        message: String,
    },
}

impl ProviderError {
    pub fn request_failed(platform: CloudPlatform, message: impl Into<String>) -> Self {
        ProviderError::RequestFailed {
            platform,
            message: message.into(),
        }
    }

    pub fn invalid_response(platform: CloudPlatform, message: impl Into<String>) -> Self {
        ProviderError::InvalidResponse {
            platform,
            message: message.into(),
        }
    }

    /// Platform whose adapter produced the error
    pub fn platform(&self) -> CloudPlatform {
        match self {
            ProviderError::RequestFailed { platform, .. }
            | ProviderError::InvalidResponse { platform, .. } => *platform,
        }
    }
}

/// Errors that can occur while connecting provider adapters
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConnectError {
    /// Credentials were rejected before an adapter could be built
    #[error("{platform} credentials rejected: {reason}")]
    InvalidCredentials {
        platform: CloudPlatform,
        reason: String,
    },

    /// The adapter could not be constructed
    #[error("{platform} provider initialization failed: {reason}")]
    Initialization {
        platform: CloudPlatform,
        reason: String,
    },
}

impl ConnectError {
    pub fn platform(&self) -> CloudPlatform {
        match self {
            ConnectError::InvalidCredentials { platform, .. }
            | ConnectError::Initialization { platform, .. } => *platform,
        }
    }
}

/// A scan phase aborted because one of its adapter calls failed
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{phase} scan failed: {source}")]
pub struct PhaseError {
    pub phase: ScanPhase,
    #[source]
    pub source: ProviderError,
}

/// Scan-level failure, carrying the id of the scan that failed
#[derive(Debug, Clone, Error, PartialEq)]
#[error("Scan {scan_id} failed: {source}")]
pub struct ScanError {
    pub scan_id: Uuid,
    #[source]
    pub source: PhaseError,
}

impl ScanError {
    pub fn phase(&self) -> ScanPhase {
        self.source.phase
    }

    pub fn platform(&self) -> CloudPlatform {
        self.source.source.platform()
    }
}

/// Errors raised while loading engine configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}
