use super::normalize_module_name;
use crate::error::ManifestError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One module shipped with the application, loaded or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPart {
    /// File name of the module, e.g. `Reporting.dll`
    pub source: String,
}

impl DeploymentPart {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn normalized_name(&self) -> String {
        normalize_module_name(&self.source)
    }

    /// Case-insensitive match, ignoring library extensions on either side
    pub fn matches(&self, module_name: &str) -> bool {
        self.normalized_name() == normalize_module_name(module_name)
    }
}

/// The modules that make up the deployed application
///
/// ```json
/// { "parts": [ { "source": "Reporting.dll" }, { "source": "Billing.dll" } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentManifest {
    #[serde(default)]
    pub parts: Vec<DeploymentPart>,
}

impl DeploymentManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(mut self, source: impl Into<String>) -> Self {
        self.parts.push(DeploymentPart::new(source));
        self
    }

    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        tracing::debug!("Reading deployment manifest from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Source names as declared
    pub fn module_names(&self) -> Vec<String> {
        self.parts.iter().map(|part| part.source.clone()).collect()
    }

    pub fn contains(&self, module_name: &str) -> bool {
        self.parts.iter().any(|part| part.matches(module_name))
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_manifest() {
        let manifest = DeploymentManifest::from_json(
            r#"{ "parts": [ { "source": "Reporting.dll" }, { "source": "Billing.DLL" } ] }"#,
        )
        .unwrap();

        assert_eq!(manifest.module_names(), vec!["Reporting.dll", "Billing.DLL"]);
        assert!(manifest.contains("reporting"));
        assert!(manifest.contains("BILLING.dll"));
        assert!(!manifest.contains("Shipping"));
    }

    #[test]
    fn test_missing_parts_is_empty_manifest() {
        let manifest = DeploymentManifest::from_json("{}").unwrap();
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_invalid_manifest() {
        let err = DeploymentManifest::from_json("{ \"parts\": 3 }").unwrap_err();
        assert!(matches!(err, ManifestError::Parse(_)));
    }

    #[test]
    fn test_manifest_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "parts": [ {{ "source": "Storage.dll" }} ] }}"#).unwrap();

        let manifest = DeploymentManifest::from_path(file.path()).unwrap();
        assert_eq!(manifest, DeploymentManifest::new().with_part("Storage.dll"));
    }

    #[test]
    fn test_missing_file() {
        let err = DeploymentManifest::from_path("/nonexistent/manifest.json").unwrap_err();
        assert!(matches!(err, ManifestError::Io(_)));
    }
}
