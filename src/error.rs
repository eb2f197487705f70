use crate::activation::Phase;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ActivationError>;

/// Malformed declarations and settings, detected before anything runs
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("Invalid activation marker: type required")]
    TypeRequired,

    #[error("Invalid activation marker: method name required")]
    MethodNameRequired,

    #[error("Invalid setting {key}={value}")]
    InvalidSetting { key: String, value: String },

    #[error("{0} not provided")]
    Missing(&'static str),
}

/// Errors raised while invoking activation methods
#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("The type {type_name} does not have a static method named {method}")]
    Lookup { type_name: String, method: String },

    #[error("Activation method {type_name}::{method} failed: {source}")]
    Invocation {
        type_name: String,
        method: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("{phase} phase finished with {} failed activation(s)", .failures.len())]
    PhaseFailed {
        phase: Phase,
        failures: Vec<ActivationError>,
    },
}

impl ActivationError {
    pub fn lookup(type_name: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Lookup {
            type_name: type_name.into(),
            method: method.into(),
        }
    }

    pub fn invocation(
        type_name: impl Into<String>,
        method: impl Into<String>,
        source: anyhow::Error,
    ) -> Self {
        Self::Invocation {
            type_name: type_name.into(),
            method: method.into(),
            source,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, Self::Lookup { .. })
    }
}

/// A module could not be brought into the process
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Module not found: {0}")]
    NotFound(String),

    #[error("Failed to load module {name}: {reason}")]
    LoadFailed { name: String, reason: String },

    #[error("Module {name} has an invalid format: {reason}")]
    BadFormat { name: String, reason: String },
}

/// A module's activation metadata could not be read
#[derive(Debug, Error)]
#[error("Failed to read activation metadata of {module}: {reason}")]
pub struct ScanError {
    pub module: String,
    pub reason: String,
}

impl ScanError {
    pub fn new(module: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read deployment manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid deployment manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message_names_type_and_method() {
        let err = ActivationError::lookup("Bootstrap", "Boot");
        assert!(err.is_lookup());
        assert_eq!(
            err.to_string(),
            "The type Bootstrap does not have a static method named Boot"
        );
    }

    #[test]
    fn test_invocation_keeps_source() {
        let err = ActivationError::invocation("Cache", "warm", anyhow::anyhow!("disk full"));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("disk full"));
    }

    #[test]
    fn test_phase_failed_counts_failures() {
        let err = ActivationError::PhaseFailed {
            phase: Phase::Exit,
            failures: vec![
                ActivationError::lookup("A", "a"),
                ActivationError::lookup("B", "b"),
            ],
        };
        assert_eq!(err.to_string(), "exit phase finished with 2 failed activation(s)");
    }
}
