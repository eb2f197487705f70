//! Activation Dispatcher
//!
//! Collects, orders and invokes the activation markers of a phase.

use super::{ActivationMarker, DispatcherBuilder, MarkerScanner, MethodInvoker, Phase};
use crate::config::{ActivatorConfig, CandidateSource, FailurePolicy};
use crate::error::{ActivationError, Result};
use crate::module::{ModuleHost, ModuleId, ModuleRef, normalize_module_name};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of a successful [`ActivationDispatcher::run`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub phase: Phase,
    pub modules_scanned: usize,
    pub invoked: usize,
}

/// Runs the activation methods declared by the application's modules
///
/// The dispatcher is responsible for:
/// - Force-loading deployment modules once, when configured to
/// - Skipping its own module
/// - Ordering markers by their declared order, keeping discovery order on ties
/// - Invoking markers one after the other on the calling thread
///
/// It carries the two set-once flags of the activation machinery: whether it
/// has been bound to a host's lifecycle, and whether deployment modules have
/// been force-loaded. Build one per process and share it behind an `Arc`.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = ActivationDispatcher::builder()
///     .host(catalog)
///     .invoker(registry)
///     .load_deployment_parts(true)
///     .build()?;
///
/// let summary = dispatcher.run(Phase::Startup)?;
/// tracing::info!("{} activation method(s) ran", summary.invoked);
/// ```
pub struct ActivationDispatcher {
    host: Arc<dyn ModuleHost>,
    invoker: Arc<dyn MethodInvoker>,
    config: ActivatorConfig,
    own_module: ModuleId,
    initialized: AtomicBool,
    deployment_parts_loaded: AtomicBool,
}

impl ActivationDispatcher {
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Create a dispatcher with the default configuration
    pub fn new(host: Arc<dyn ModuleHost>, invoker: Arc<dyn MethodInvoker>) -> Self {
        Self::with_config(host, invoker, ActivatorConfig::default(), ModuleId::own())
    }

    pub(crate) fn with_config(
        host: Arc<dyn ModuleHost>,
        invoker: Arc<dyn MethodInvoker>,
        config: ActivatorConfig,
        own_module: ModuleId,
    ) -> Self {
        Self {
            host,
            invoker,
            config,
            own_module,
            initialized: AtomicBool::new(false),
            deployment_parts_loaded: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &ActivatorConfig {
        &self.config
    }

    pub fn own_module(&self) -> &ModuleId {
        &self.own_module
    }

    /// Whether lifecycle handlers have been installed for this dispatcher
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::Acquire)
    }

    pub fn deployment_parts_loaded(&self) -> bool {
        self.deployment_parts_loaded.load(Ordering::Acquire)
    }

    /// Flip the `initialized` flag. Only the first caller gets `true`.
    pub(crate) fn mark_initialized(&self) -> bool {
        self.initialized
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn run_startup(&self) -> Result<RunSummary> {
        self.run(Phase::Startup)
    }

    pub fn run_exit(&self) -> Result<RunSummary> {
        self.run(Phase::Exit)
    }

    /// Run every activation method declared for `phase`
    ///
    /// # Errors
    ///
    /// With [`FailurePolicy::Abort`] the first failing marker's error is
    /// returned and the remaining markers do not run. With
    /// [`FailurePolicy::Continue`] every marker runs and the failures are
    /// returned together as [`ActivationError::PhaseFailed`].
    pub fn run(&self, phase: Phase) -> Result<RunSummary> {
        tracing::info!("Running {} activation methods...", phase);

        self.load_deployment_parts_once();

        let modules = self.candidate_modules();
        let markers = Self::collect_markers(&modules, phase);
        let invoked = self.invoke_all(phase, &markers)?;

        tracing::info!(
            "{} activation complete ({} of {} methods invoked, {} modules scanned)",
            phase,
            invoked,
            markers.len(),
            modules.len()
        );

        Ok(RunSummary {
            phase,
            modules_scanned: modules.len(),
            invoked,
        })
    }

    fn load_deployment_parts_once(&self) {
        if !self.config.load_deployment_parts {
            return;
        }
        if self
            .deployment_parts_loaded
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let names = self.host.deployment_module_names();
        tracing::debug!("Loading {} deployment module(s)", names.len());

        for name in names {
            let name = normalize_module_name(&name);
            if name.is_empty() {
                continue;
            }
            match self.host.load_module(&name) {
                Ok(module) => tracing::debug!("Deployment module available: {}", module.id()),
                // A module that cannot be loaded contributes no markers.
                Err(e) => tracing::debug!("Ignoring deployment module {}: {}", name, e),
            }
        }
    }

    fn candidate_modules(&self) -> Vec<ModuleRef> {
        let deployment: Option<Vec<String>> = match self.config.candidates {
            CandidateSource::AllLoaded => None,
            CandidateSource::DeploymentParts => Some(
                self.host
                    .deployment_module_names()
                    .iter()
                    .map(|name| normalize_module_name(name))
                    .collect(),
            ),
        };

        self.host
            .loaded_modules()
            .into_iter()
            .filter(|module| {
                if module.id() == &self.own_module {
                    tracing::debug!("Skipping own module {}", module.id());
                    return false;
                }
                deployment.as_ref().is_none_or(|parts| {
                    parts.contains(&normalize_module_name(module.name()))
                })
            })
            .collect()
    }

    fn collect_markers(modules: &[ModuleRef], phase: Phase) -> Vec<ActivationMarker> {
        let mut markers: Vec<ActivationMarker> = modules
            .iter()
            .flat_map(|module| MarkerScanner::scan(module.as_ref(), phase))
            .collect();

        // Stable: equal orders keep discovery order.
        markers.sort_by_key(ActivationMarker::order);
        markers
    }

    fn invoke_all(&self, phase: Phase, markers: &[ActivationMarker]) -> Result<usize> {
        let mut invoked = 0;

        match self.config.on_failure {
            FailurePolicy::Abort => {
                for marker in markers {
                    marker.invoke(self.invoker.as_ref()).inspect_err(|e| {
                        tracing::error!("{} activation aborted: {}", phase, e);
                    })?;
                    invoked += 1;
                }
                Ok(invoked)
            }
            FailurePolicy::Continue => {
                let mut failures = Vec::new();
                for marker in markers {
                    match marker.invoke(self.invoker.as_ref()) {
                        Ok(()) => invoked += 1,
                        Err(e) => {
                            tracing::error!(
                                "{} activation method failed, continuing: {}",
                                phase,
                                e
                            );
                            failures.push(e);
                        }
                    }
                }
                if failures.is_empty() {
                    Ok(invoked)
                } else {
                    Err(ActivationError::PhaseFailed { phase, failures })
                }
            }
        }
    }
}
