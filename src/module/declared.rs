use super::{ActivationModule, ModuleId};
use crate::activation::ActivationMarker;
use crate::error::ScanError;
use std::sync::{PoisonError, RwLock};

/// A module whose markers are registered explicitly at runtime
///
/// # Example
/// ```rust,ignore
/// let module = DeclaredModule::new("reporting")
///     .with_name("Reporting.dll")
///     .marker(ActivationMarker::startup("ReportCache", "warm")?.with_order(1));
/// ```
#[derive(Debug)]
pub struct DeclaredModule {
    id: ModuleId,
    name: String,
    markers: RwLock<Vec<ActivationMarker>>,
}

impl DeclaredModule {
    pub fn new(id: impl Into<ModuleId>) -> Self {
        let id = id.into();
        Self {
            name: id.as_str().to_string(),
            id,
            markers: RwLock::new(Vec::new()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn marker(self, marker: ActivationMarker) -> Self {
        self.push(marker);
        self
    }

    /// Append a marker after the ones already declared
    pub fn push(&self, marker: ActivationMarker) {
        self.markers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(marker);
    }

    pub fn len(&self) -> usize {
        self.markers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ActivationModule for DeclaredModule {
    fn id(&self) -> &ModuleId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn markers(&self) -> std::result::Result<Vec<ActivationMarker>, ScanError> {
        Ok(self
            .markers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_keep_declaration_order() {
        let module = DeclaredModule::new("reporting")
            .marker(ActivationMarker::startup("A", "first").unwrap())
            .marker(ActivationMarker::exit("B", "second").unwrap());
        module.push(ActivationMarker::startup("C", "third").unwrap());

        let methods: Vec<_> = module
            .markers()
            .unwrap()
            .iter()
            .map(|m| m.method_name().to_string())
            .collect();
        assert_eq!(methods, vec!["first", "second", "third"]);
        assert_eq!(module.len(), 3);
    }

    #[test]
    fn test_name_defaults_to_id() {
        let module = DeclaredModule::new("reporting");
        assert_eq!(module.name(), "reporting");
        assert!(module.is_empty());

        let module = module.with_name("Reporting.dll");
        assert_eq!(module.name(), "Reporting.dll");
        assert_eq!(module.id().as_str(), "reporting");
    }
}
