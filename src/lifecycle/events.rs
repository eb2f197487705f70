use super::{LifecycleHandler, LifecycleHost};
use crate::error::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// In-process source of startup and exit signals
///
/// For applications without a host runtime of their own: call
/// [`raise_startup`](Self::raise_startup) at the top of `main` and
/// [`raise_exit`](Self::raise_exit) before returning, or let
/// [`exit_on_signal`](super::exit_on_signal) raise exit on Ctrl+C / SIGTERM.
///
/// Each signal fires at most once; raising it again is a no-op.
#[derive(Default)]
pub struct ApplicationEvents {
    startup: Mutex<Vec<LifecycleHandler>>,
    exit: Mutex<Vec<LifecycleHandler>>,
    started: AtomicBool,
    exited: AtomicBool,
}

impl ApplicationEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the startup signal
    ///
    /// # Errors
    ///
    /// The first error returned by a handler; later handlers do not run.
    pub fn raise_startup(&self) -> Result<()> {
        if self.started.swap(true, Ordering::AcqRel) {
            tracing::debug!("Startup already raised");
            return Ok(());
        }
        tracing::info!("Application starting");
        Self::fire(&self.startup)
    }

    /// Fire the exit signal
    ///
    /// # Errors
    ///
    /// The first error returned by a handler; later handlers do not run.
    pub fn raise_exit(&self) -> Result<()> {
        if self.exited.swap(true, Ordering::AcqRel) {
            tracing::debug!("Exit already raised");
            return Ok(());
        }
        tracing::info!("Application exiting");
        Self::fire(&self.exit)
    }

    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    pub fn has_exited(&self) -> bool {
        self.exited.load(Ordering::Acquire)
    }

    pub fn startup_handler_count(&self) -> usize {
        self.startup.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn exit_handler_count(&self) -> usize {
        self.exit.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn fire(handlers: &Mutex<Vec<LifecycleHandler>>) -> Result<()> {
        // Taken out so a handler can subscribe without deadlocking.
        let handlers =
            std::mem::take(&mut *handlers.lock().unwrap_or_else(PoisonError::into_inner));
        for handler in &handlers {
            handler()?;
        }
        Ok(())
    }
}

impl LifecycleHost for ApplicationEvents {
    fn on_startup(&self, handler: LifecycleHandler) {
        self.startup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }

    fn on_exit(&self, handler: LifecycleHandler) {
        self.exit
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handler);
    }
}
