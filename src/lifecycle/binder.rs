use super::LifecycleHost;
use crate::activation::{ActivationDispatcher, Phase};
use std::sync::Arc;

/// Connects a dispatcher's phases to a host's lifecycle signals
///
/// Binding happens at most once per dispatcher, however many times it is
/// attempted. Bind during bootstrap, before the host fires either signal.
///
/// # Example
///
/// ```rust,ignore
/// let events = ApplicationEvents::new();
/// LifecycleBinder::bind(&dispatcher, &events);
///
/// events.raise_startup()?;
/// // ... application runs ...
/// events.raise_exit()?;
/// ```
pub struct LifecycleBinder;

impl LifecycleBinder {
    /// Subscribe `run(Startup)` and `run(Exit)` to `host`.
    ///
    /// Returns `false`, without subscribing anything, if the dispatcher was
    /// already bound.
    pub fn bind(dispatcher: &Arc<ActivationDispatcher>, host: &dyn LifecycleHost) -> bool {
        if !dispatcher.mark_initialized() {
            tracing::debug!("Activation dispatcher already bound to the application lifecycle");
            return false;
        }

        let startup = Arc::clone(dispatcher);
        host.on_startup(Box::new(move || startup.run(Phase::Startup).map(|_| ())));

        let exit = Arc::clone(dispatcher);
        host.on_exit(Box::new(move || exit.run(Phase::Exit).map(|_| ())));

        tracing::info!("Activation dispatcher bound to the application lifecycle");
        true
    }
}
