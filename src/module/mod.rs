//! Modules that declare activation markers, and the host that loads them.

mod declared;
mod deployment;
mod host;

pub use declared::DeclaredModule;
pub use deployment::{DeploymentManifest, DeploymentPart};
pub use host::{ModuleCatalog, ModuleFactory, ModuleHost};

use crate::activation::ActivationMarker;
use crate::error::ScanError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Library extensions stripped when comparing module names
const MODULE_EXTENSIONS: [&str; 4] = ["dll", "so", "dylib", "wasm"];

/// Stable identity of a loaded module
///
/// Modules are compared by this value, never by reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleId(String);

impl ModuleId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity of the module that hosts the dispatcher itself
    pub fn own() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModuleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ModuleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A loaded unit of code that may declare activation markers
///
/// Implement by hand, build a [`DeclaredModule`], or derive one with the
/// `#[activation_module(...)]` attribute.
///
/// # Example
/// ```rust,ignore
/// use activator::prelude::*;
///
/// #[activation_module(
///     startup = [Database::connect(order = 1), Cache::warm],
///     exit = [Database::disconnect],
/// )]
/// pub struct StorageModule;
/// ```
pub trait ActivationModule: Send + Sync {
    fn id(&self) -> &ModuleId;

    /// File-style name matched against deployment parts, e.g. `Storage.dll`
    fn name(&self) -> &str {
        self.id().as_str()
    }

    /// Every marker declared on the module, in declaration order
    ///
    /// # Errors
    /// Returns [`ScanError`] if the module's metadata cannot be read.
    fn markers(&self) -> std::result::Result<Vec<ActivationMarker>, ScanError>;
}

pub type ModuleRef = Arc<dyn ActivationModule>;

/// Canonical form of a module name: trimmed, lowercase, without a library extension.
///
/// `"Reporting.DLL"`, `"reporting"` and `" Reporting.dll "` all become `"reporting"`.
pub fn normalize_module_name(name: &str) -> String {
    let name = name.trim();
    let stem = match name.rsplit_once('.') {
        Some((stem, ext))
            if MODULE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known)) =>
        {
            stem
        }
        _ => name,
    };
    stem.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_library_extension() {
        assert_eq!(normalize_module_name("Reporting.dll"), "reporting");
        assert_eq!(normalize_module_name("Reporting.DLL"), "reporting");
        assert_eq!(normalize_module_name("libcache.so"), "libcache");
        assert_eq!(normalize_module_name(" Foo.Bar.dylib "), "foo.bar");
    }

    #[test]
    fn test_normalize_keeps_dotted_names() {
        assert_eq!(normalize_module_name("Company.Reporting"), "company.reporting");
        assert_eq!(normalize_module_name("   "), "");
    }

    #[test]
    fn test_own_module_is_this_crate() {
        assert_eq!(ModuleId::own().as_str(), "activator");
    }
}
