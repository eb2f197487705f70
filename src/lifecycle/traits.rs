//! Lifecycle host contract
//!
//! A host is whatever raises the application's "starting" and "exiting"
//! signals: a UI toolkit's application object, a service runtime, or
//! [`ApplicationEvents`](super::ApplicationEvents) for plain processes.

use crate::error::Result;

/// Handler subscribed to a lifecycle signal
///
/// Its error is handed back to whoever raised the signal.
pub type LifecycleHandler = Box<dyn Fn() -> Result<()> + Send + Sync>;

/// Source of the application's startup and exit signals
///
/// # Example
///
/// ```rust,ignore
/// use activator::lifecycle::{LifecycleHandler, LifecycleHost};
///
/// impl LifecycleHost for MyRuntime {
///     fn on_startup(&self, handler: LifecycleHandler) {
///         self.startup_callbacks.lock().unwrap().push(handler);
///     }
///
///     fn on_exit(&self, handler: LifecycleHandler) {
///         self.exit_callbacks.lock().unwrap().push(handler);
///     }
/// }
/// ```
pub trait LifecycleHost {
    /// Subscribe to the signal fired once, before the application presents itself
    fn on_startup(&self, handler: LifecycleHandler);

    /// Subscribe to the signal fired once, during teardown
    fn on_exit(&self, handler: LifecycleHandler);
}
