use super::{ActivationDispatcher, MethodInvoker};
use crate::config::{ActivatorConfig, CandidateSource, FailurePolicy};
use crate::error::ConfigurationError;
use crate::module::{ModuleHost, ModuleId};
use std::sync::Arc;

/// Builder for an [`ActivationDispatcher`]
///
/// # Example
/// ```rust,ignore
/// let dispatcher = ActivationDispatcher::builder()
///     .host(catalog)
///     .invoker(registry)
///     .config(ActivatorConfig::from_env()?)
///     .build()?;
/// ```
pub struct DispatcherBuilder {
    host: Option<Arc<dyn ModuleHost>>,
    invoker: Option<Arc<dyn MethodInvoker>>,
    config: ActivatorConfig,
    own_module: ModuleId,
}

impl DispatcherBuilder {
    pub fn new() -> Self {
        Self {
            host: None,
            invoker: None,
            config: ActivatorConfig::default(),
            own_module: ModuleId::own(),
        }
    }

    /// Set where modules come from
    pub fn host(mut self, host: Arc<dyn ModuleHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Set how activation methods are called
    pub fn invoker(mut self, invoker: Arc<dyn MethodInvoker>) -> Self {
        self.invoker = Some(invoker);
        self
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: ActivatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn load_deployment_parts(mut self, enabled: bool) -> Self {
        self.config.load_deployment_parts = enabled;
        self
    }

    pub fn candidates(mut self, candidates: CandidateSource) -> Self {
        self.config.candidates = candidates;
        self
    }

    pub fn on_failure(mut self, policy: FailurePolicy) -> Self {
        self.config.on_failure = policy;
        self
    }

    /// Identity of the module to exclude from scanning. Defaults to [`ModuleId::own`].
    pub fn own_module(mut self, id: impl Into<ModuleId>) -> Self {
        self.own_module = id.into();
        self
    }

    /// Build the dispatcher
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Missing`] if no host or no invoker was set.
    pub fn build(self) -> Result<ActivationDispatcher, ConfigurationError> {
        let host = self.host.ok_or(ConfigurationError::Missing("Module host"))?;
        let invoker = self
            .invoker
            .ok_or(ConfigurationError::Missing("Method invoker"))?;

        tracing::debug!(
            "Building activation dispatcher (own module {}, {:?})",
            self.own_module,
            self.config
        );
        Ok(ActivationDispatcher::with_config(
            host,
            invoker,
            self.config,
            self.own_module,
        ))
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
