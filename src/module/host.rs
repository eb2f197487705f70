use super::{
    ActivationModule, DeclaredModule, DeploymentManifest, ModuleId, ModuleRef,
    normalize_module_name,
};
use crate::activation::ActivationMarker;
use crate::error::LoadError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::{Arc, PoisonError, RwLock};

/// Produces a module on demand. Used for modules that ship with the
/// application but are not loaded until asked for.
pub type ModuleFactory = Arc<dyn Fn() -> Result<ModuleRef, LoadError> + Send + Sync>;

/// Everything the dispatcher needs to know about the running application's modules
pub trait ModuleHost: Send + Sync {
    /// Modules currently loaded, in load order
    fn loaded_modules(&self) -> Vec<ModuleRef>;

    /// Names of every module the deployment declares, loaded or not
    fn deployment_module_names(&self) -> Vec<String>;

    /// Load a module by name, or return it if it is already loaded
    ///
    /// # Errors
    /// [`LoadError::NotFound`], [`LoadError::LoadFailed`] or [`LoadError::BadFormat`].
    fn load_module(&self, name: &str) -> Result<ModuleRef, LoadError>;
}

/// In-process [`ModuleHost`]
///
/// Tracks loaded modules, lazily-loadable modules and the deployment
/// manifest. Also the explicit registration point for markers.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = ModuleCatalog::new()
///     .with_manifest(DeploymentManifest::new().with_part("Reporting.dll"));
///
/// let warm = ActivationMarker::startup("Reports", "warm")?;
/// catalog.register_marker(&ModuleId::new("reporting"), warm);
/// catalog.register_available("Billing.dll", || Ok(Arc::new(billing_module()) as ModuleRef));
/// ```
#[derive(Default)]
pub struct ModuleCatalog {
    loaded: RwLock<Vec<ModuleRef>>,
    declared: DashMap<ModuleId, Arc<DeclaredModule>>,
    available: DashMap<String, ModuleFactory>,
    manifest: RwLock<DeploymentManifest>,
}

impl ModuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manifest(self, manifest: DeploymentManifest) -> Self {
        self.set_manifest(manifest);
        self
    }

    pub fn set_manifest(&self, manifest: DeploymentManifest) {
        *self.manifest.write().unwrap_or_else(PoisonError::into_inner) = manifest;
    }

    pub fn manifest(&self) -> DeploymentManifest {
        self.manifest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Add an already loaded module. Returns `false` if a module with the same
    /// id is loaded already.
    pub fn add_module(&self, module: impl ActivationModule + 'static) -> bool {
        self.add_module_ref(Arc::new(module))
    }

    pub fn add_module_ref(&self, module: ModuleRef) -> bool {
        let mut loaded = self.loaded.write().unwrap_or_else(PoisonError::into_inner);
        if loaded.iter().any(|m| m.id() == module.id()) {
            tracing::warn!("Module {} is already loaded", module.id());
            return false;
        }
        tracing::debug!("Module loaded: {}", module.id());
        loaded.push(module);
        true
    }

    /// Declare `marker` on `module`, creating and loading a [`DeclaredModule`]
    /// the first time the id is seen.
    ///
    /// Returns `false` if `module` names a loaded module that was not created here.
    pub fn register_marker(&self, module: &ModuleId, marker: ActivationMarker) -> bool {
        let declared = match self.declared.entry(module.clone()) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => {
                let declared = Arc::new(DeclaredModule::new(module.clone()));
                if !self.add_module_ref(Arc::clone(&declared) as ModuleRef) {
                    return false;
                }
                entry.insert(Arc::clone(&declared));
                declared
            }
        };

        tracing::debug!(
            "Registered {} marker {}::{} on {}",
            marker.phase(),
            marker.target_type(),
            marker.method_name(),
            module
        );
        declared.push(marker);
        true
    }

    /// Make a module loadable by name without loading it
    pub fn register_available<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Result<ModuleRef, LoadError> + Send + Sync + 'static,
    {
        self.available
            .insert(normalize_module_name(name), Arc::new(factory));
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.find_loaded(&normalize_module_name(name)).is_some()
    }

    pub fn len(&self) -> usize {
        self.loaded.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn find_loaded(&self, normalized: &str) -> Option<ModuleRef> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|m| {
                normalize_module_name(m.name()) == normalized
                    || normalize_module_name(m.id().as_str()) == normalized
            })
            .cloned()
    }
}

impl ModuleHost for ModuleCatalog {
    fn loaded_modules(&self) -> Vec<ModuleRef> {
        self.loaded
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn deployment_module_names(&self) -> Vec<String> {
        self.manifest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .module_names()
    }

    fn load_module(&self, name: &str) -> Result<ModuleRef, LoadError> {
        let key = normalize_module_name(name);
        if let Some(module) = self.find_loaded(&key) {
            return Ok(module);
        }

        let factory = self
            .available
            .get(&key)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LoadError::NotFound(name.to_string()))?;

        let module = factory()?;
        if !self.add_module_ref(Arc::clone(&module)) {
            return Err(LoadError::LoadFailed {
                name: name.to_string(),
                reason: format!("module id {} already loaded", module.id()),
            });
        }
        self.available.remove(&key);
        Ok(module)
    }
}
