//! Signal-driven exit
//!
//! Raises the exit signal of an [`ApplicationEvents`] when the process is
//! asked to stop.

use super::ApplicationEvents;
use crate::error::Result;
use tokio::signal;

/// Wait for a shutdown signal, then raise exit on `events`
///
/// # Example
///
/// ```rust,ignore
/// use activator::lifecycle::{exit_on_signal, ApplicationEvents, LifecycleBinder};
///
/// #[tokio::main]
/// async fn main() -> activator::Result<()> {
///     let events = ApplicationEvents::new();
///     LifecycleBinder::bind(&dispatcher, &events);
///     events.raise_startup()?;
///
///     exit_on_signal(&events).await
/// }
/// ```
pub async fn exit_on_signal(events: &ApplicationEvents) -> Result<()> {
    exit_on(events, shutdown_signal()).await
}

/// Wait for `signal` to complete, then raise exit on `events`
pub async fn exit_on(events: &ApplicationEvents, signal: impl Future<Output = ()>) -> Result<()> {
    signal.await;
    tracing::info!("Raising exit after shutdown signal");
    events.raise_exit()
}

/// Create a future that completes when a shutdown signal is received
///
/// A listener that cannot be installed never completes; the other one still does.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActivationError;
    use crate::lifecycle::LifecycleHost;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_exit_on_runs_exit_handlers_once() {
        let events = ApplicationEvents::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        events.on_exit(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }));

        exit_on(&events, std::future::ready(())).await.unwrap();
        exit_on(&events, std::future::ready(())).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(events.has_exited());
    }

    #[tokio::test]
    async fn test_exit_on_returns_handler_error() {
        let events = ApplicationEvents::new();
        events.on_exit(Box::new(|| Err(ActivationError::lookup("Cache", "flush"))));

        let err = exit_on(&events, async {}).await.unwrap_err();
        assert!(err.is_lookup());
    }
}
