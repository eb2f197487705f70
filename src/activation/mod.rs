//! Activation Markers and Dispatch
//!
//! An [`ActivationMarker`] names a static method that must run when the
//! application reaches a lifecycle [`Phase`]. Markers are declared on modules,
//! collected by the [`MarkerScanner`], ordered and invoked by the
//! [`ActivationDispatcher`].
//!
//! # Dispatch
//!
//! ```text
//! 1. Force-load deployment modules (once, optional)
//!    ↓
//! 2. List candidate modules (minus the dispatcher's own module)
//!    ↓
//! 3. Scan each module for markers of the phase
//!    ↓
//! 4. Stable sort by order
//!    ↓
//! 5. Invoke each marker in turn
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use activator::prelude::*;
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.register_fn("Database", "connect", || Ok(()));
//!
//! let catalog = Arc::new(ModuleCatalog::new());
//! let connect = ActivationMarker::startup("Database", "connect")?;
//! catalog.register_marker(&ModuleId::new("storage"), connect);
//!
//! let dispatcher = ActivationDispatcher::builder()
//!     .host(catalog)
//!     .invoker(registry)
//!     .build()?;
//! dispatcher.run(Phase::Startup)?;
//! ```

mod builder;
mod dispatcher;
mod invoker;
mod marker;
mod scanner;

pub use builder::DispatcherBuilder;
pub use dispatcher::{ActivationDispatcher, RunSummary};
pub use invoker::{
    Activatable, ActivationFn, IntoActivationResult, MethodFn, MethodInvoker, TypeRef,
    TypeRegistry,
};
pub use marker::{ActivationMarker, DEFAULT_ORDER, Phase};
pub use scanner::MarkerScanner;
