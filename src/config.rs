//! Engine configuration

use std::env;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scanners::FailurePolicy;

/// Module switches and runtime settings of the scan engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Run the cost phase when a scan asks for it
    pub cost_optimization_enabled: bool,
    /// Run the security phase when a scan asks for it
    pub security_enabled: bool,
    pub failure_policy: FailurePolicy,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cost_optimization_enabled: true,
            security_enabled: true,
            failure_policy: FailurePolicy::FailFast,
            log_level: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load from `SKYSPEAR_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("SKYSPEAR_COST_OPTIMIZATION") {
            config.cost_optimization_enabled = parse_flag("SKYSPEAR_COST_OPTIMIZATION", &value)?;
        }
        if let Some(value) = lookup("SKYSPEAR_SECURITY") {
            config.security_enabled = parse_flag("SKYSPEAR_SECURITY", &value)?;
        }
        if let Some(value) = lookup("SKYSPEAR_FAILURE_POLICY") {
            config.failure_policy = value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "SKYSPEAR_FAILURE_POLICY".to_string(),
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup("SKYSPEAR_LOG_LEVEL") {
            if !value.trim().is_empty() {
                config.log_level = value.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_both_modules() {
        let config = EngineConfig::from_lookup(|_| None).unwrap();

        assert_eq!(config, EngineConfig::default());
        assert!(config.cost_optimization_enabled);
        assert!(config.security_enabled);
        assert_eq!(config.failure_policy, FailurePolicy::FailFast);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = EngineConfig::from_lookup(|key| match key {
            "SKYSPEAR_SECURITY" => Some("off".to_string()),
            "SKYSPEAR_FAILURE_POLICY" => Some("isolate".to_string()),
            "SKYSPEAR_LOG_LEVEL" => Some("debug".to_string()),
            _ => None,
        })
        .unwrap();

        assert!(config.cost_optimization_enabled);
        assert!(!config.security_enabled);
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = EngineConfig::from_lookup(|key| {
            (key == "SKYSPEAR_COST_OPTIMIZATION").then(|| "maybe".to_string())
        })
        .unwrap_err();

        assert_eq!(err.to_string(), "Invalid value for SKYSPEAR_COST_OPTIMIZATION: \"maybe\"");
    }

    #[test]
    fn test_partial_json_config() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"failure_policy": "isolate"}"#).unwrap();

        assert_eq!(config.failure_policy, FailurePolicy::Isolate);
        assert!(config.security_enabled);
    }
}
