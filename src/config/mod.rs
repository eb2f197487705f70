use crate::error::ConfigurationError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use strum_macros::{Display, EnumString};

pub const LOAD_DEPLOYMENT_PARTS_KEY: &str = "ACTIVATOR_LOAD_DEPLOYMENT_PARTS";
pub const CANDIDATES_KEY: &str = "ACTIVATOR_CANDIDATES";
pub const ON_FAILURE_KEY: &str = "ACTIVATOR_ON_FAILURE";

/// Configuration service
#[derive(Clone, Default)]
pub struct ConfigService {
    config: Arc<DashMap<String, String>>,
}

impl ConfigService {
    pub fn new() -> Self {
        let service = Self::default();
        for (key, value) in env::vars() {
            service.set(&key, &value);
        }
        service
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.config.get(key).map(|v| v.clone())
    }

    pub fn set(&self, key: &str, value: &str) {
        self.config.insert(key.to_string(), value.to_string());
    }
}

/// Which loaded modules are searched for markers
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum CandidateSource {
    /// Every loaded module
    #[default]
    AllLoaded,
    /// Only loaded modules named in the deployment manifest
    DeploymentParts,
}

/// What a run does when an activation method fails
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop at the first failure; later markers do not run
    #[default]
    Abort,
    /// Run every marker, then report all failures together
    Continue,
}

/// Dispatcher settings
///
/// ```json
/// { "load_deployment_parts": true, "candidates": "deployment-parts", "on_failure": "abort" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivatorConfig {
    /// Force-load every deployment module once, before the first scan
    pub load_deployment_parts: bool,
    pub candidates: CandidateSource,
    pub on_failure: FailurePolicy,
}

impl ActivatorConfig {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_service(&ConfigService::new())
    }

    /// Read settings from `service`, keeping defaults for absent keys
    pub fn from_service(service: &ConfigService) -> Result<Self, ConfigurationError> {
        let mut config = Self::default();

        if let Some(value) = service.get(LOAD_DEPLOYMENT_PARTS_KEY) {
            config.load_deployment_parts = parse_flag(LOAD_DEPLOYMENT_PARTS_KEY, &value)?;
        }
        if let Some(candidates) = parse_setting(service, CANDIDATES_KEY)? {
            config.candidates = candidates;
        }
        if let Some(policy) = parse_setting(service, ON_FAILURE_KEY)? {
            config.on_failure = policy;
        }

        Ok(config)
    }
}

fn parse_setting<T: FromStr>(
    service: &ConfigService,
    key: &str,
) -> Result<Option<T>, ConfigurationError> {
    service
        .get(key)
        .map(|value| T::from_str(value.trim()).map_err(|_| invalid_setting(key, &value)))
        .transpose()
}

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigurationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(invalid_setting(key, value)),
    }
}

fn invalid_setting(key: &str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidSetting {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ActivatorConfig::from_service(&ConfigService::default()).unwrap();
        assert_eq!(config, ActivatorConfig::default());
        assert!(!config.load_deployment_parts);
        assert_eq!(config.candidates, CandidateSource::AllLoaded);
        assert_eq!(config.on_failure, FailurePolicy::Abort);
    }

    #[test]
    fn test_read_from_service() {
        let service = ConfigService::default();
        service.set(LOAD_DEPLOYMENT_PARTS_KEY, "TRUE");
        service.set(CANDIDATES_KEY, "Deployment-Parts");
        service.set(ON_FAILURE_KEY, " continue ");

        let config = ActivatorConfig::from_service(&service).unwrap();
        assert!(config.load_deployment_parts);
        assert_eq!(config.candidates, CandidateSource::DeploymentParts);
        assert_eq!(config.on_failure, FailurePolicy::Continue);
    }

    #[test]
    fn test_invalid_values() {
        let service = ConfigService::default();
        service.set(LOAD_DEPLOYMENT_PARTS_KEY, "sometimes");
        assert_eq!(
            ActivatorConfig::from_service(&service),
            Err(ConfigurationError::InvalidSetting {
                key: LOAD_DEPLOYMENT_PARTS_KEY.to_string(),
                value: "sometimes".to_string(),
            })
        );

        let service = ConfigService::default();
        service.set(ON_FAILURE_KEY, "retry");
        assert!(ActivatorConfig::from_service(&service).is_err());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ActivatorConfig =
            serde_json::from_str(r#"{ "candidates": "deployment-parts" }"#).unwrap();
        assert_eq!(config.candidates, CandidateSource::DeploymentParts);
        assert!(!config.load_deployment_parts);
        assert_eq!(FailurePolicy::Continue.to_string(), "continue");
    }
}
