//! # Activator
//!
//! Ordered startup and exit activation hooks for Rust applications.
//!
//! Modules declare *activation markers*: "run `Type::method` when the
//! application starts" (or exits), with an optional order. At startup and at
//! exit the [`ActivationDispatcher`] collects the markers of every loaded
//! module, sorts them by order and runs them one after the other.
//!
//! ## Features
//!
//! - **Declarative markers**: `#[activation_module]` on a module struct, or explicit registration
//! - **Ordered dispatch**: ascending order, declaration order on ties
//! - **Fault isolation**: a module whose metadata cannot be read is skipped
//! - **Deployment awareness**: optionally force-load every deployed module before the first scan
//! - **Single binding**: lifecycle handlers are installed exactly once per dispatcher
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use activator::prelude::*;
//!
//! // 1. Export activation methods
//! pub struct Database;
//!
//! #[activatable]
//! impl Database {
//!     fn connect() -> anyhow::Result<()> {
//!         // Open the pool
//!         Ok(())
//!     }
//!
//!     fn disconnect() {}
//! }
//!
//! // 2. Declare when they run
//! #[activation_module(
//!     startup = [Database::connect(order = 1)],
//!     exit = [Database::disconnect],
//! )]
//! pub struct StorageModule;
//!
//! // 3. Wire the dispatcher
//! fn main() -> activator::Result<()> {
//!     let registry = Arc::new(TypeRegistry::new());
//!     registry.register::<Database>();
//!
//!     let catalog = Arc::new(ModuleCatalog::new());
//!     catalog.add_module(StorageModule);
//!
//!     let dispatcher = Arc::new(ActivationDispatcher::new(catalog, registry));
//!     let events = ApplicationEvents::new();
//!     LifecycleBinder::bind(&dispatcher, &events);
//!
//!     events.raise_startup()?;
//!     // ... application runs ...
//!     events.raise_exit()
//! }
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod module;

// Re-export core types
pub use activation::{
    Activatable, ActivationDispatcher, ActivationMarker, DispatcherBuilder, MarkerScanner,
    MethodInvoker, Phase, RunSummary, TypeRef, TypeRegistry,
};
pub use config::{ActivatorConfig, CandidateSource, ConfigService, FailurePolicy};
pub use error::{ActivationError, ConfigurationError, LoadError, Result, ScanError};
pub use lifecycle::{ApplicationEvents, LifecycleBinder, LifecycleHost};
pub use module::{ActivationModule, DeclaredModule, ModuleCatalog, ModuleHost, ModuleId};

// Re-export macros
pub use activator_macro::{activatable, activation_module};

/// Prelude module for convenient imports
///
/// ```
/// use activator::prelude::*;
/// ```
pub mod prelude {
    pub use crate::activation::{
        Activatable, ActivationDispatcher, ActivationMarker, DEFAULT_ORDER, DispatcherBuilder,
        MarkerScanner, MethodInvoker, Phase, RunSummary, TypeRef, TypeRegistry,
    };
    pub use crate::config::{ActivatorConfig, CandidateSource, ConfigService, FailurePolicy};
    pub use crate::error::{
        ActivationError, ConfigurationError, LoadError, ManifestError, Result, ScanError,
    };
    pub use crate::lifecycle::{
        ApplicationEvents, LifecycleBinder, LifecycleHandler, LifecycleHost, exit_on,
        exit_on_signal, shutdown_signal,
    };
    pub use crate::module::{
        ActivationModule, DeclaredModule, DeploymentManifest, DeploymentPart, ModuleCatalog,
        ModuleHost, ModuleId, ModuleRef,
    };
    pub use crate::{activatable, activation_module};
    pub use std::sync::Arc;
}
