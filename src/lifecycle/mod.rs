//! Application Lifecycle
//!
//! Connects the activation dispatcher to the moments the application starts
//! and exits.
//!
//! # Lifecycle Phases
//!
//! ```text
//! 1. Bootstrap: build the dispatcher, LifecycleBinder::bind
//!    ↓
//! 2. Host raises startup  → run(Startup)   ← Activation methods
//!    ↓
//! [Running...]
//!    ↓
//! 3. Shutdown signal (SIGTERM/SIGINT) or explicit exit
//!    ↓
//! 4. Host raises exit     → run(Exit)      ← Activation methods
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use activator::prelude::*;
//!
//! let dispatcher = Arc::new(ActivationDispatcher::new(catalog, registry));
//! let events = ApplicationEvents::new();
//! LifecycleBinder::bind(&dispatcher, &events);
//!
//! events.raise_startup()?;
//! exit_on_signal(&events).await?;
//! ```

mod binder;
mod events;
mod shutdown;
mod traits;

pub use binder::LifecycleBinder;
pub use events::ApplicationEvents;
pub use shutdown::{exit_on, exit_on_signal, shutdown_signal};
pub use traits::{LifecycleHandler, LifecycleHost};
