use super::{Activatable, MethodInvoker, TypeRef};
use crate::error::{ConfigurationError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Order of a marker that did not ask for one: after every explicit order.
pub const DEFAULT_ORDER: i32 = i32::MAX;

/// The two moments at which activation methods run
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Before the application presents itself
    Startup,
    /// During application teardown
    Exit,
}

/// A declaration that `target_type::method_name` must run during `phase`.
///
/// The marker is validated when it is built: a blank type or method name is a
/// configuration error and never reaches the dispatcher. Whether the method
/// actually exists is only checked when the marker is invoked.
///
/// # Example
///
/// ```rust,ignore
/// let marker = ActivationMarker::startup("Database", "connect")?.with_order(10);
/// assert_eq!(marker.order(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationMarker {
    target_type: TypeRef,
    method_name: String,
    phase: Phase,
    order: i32,
}

impl ActivationMarker {
    /// Build a marker with the default order
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::TypeRequired`] if the type name is blank,
    /// [`ConfigurationError::MethodNameRequired`] if the method name is blank.
    pub fn new(
        target_type: impl Into<TypeRef>,
        method_name: impl Into<String>,
        phase: Phase,
    ) -> std::result::Result<Self, ConfigurationError> {
        let target_type = target_type.into();
        if target_type.is_blank() {
            return Err(ConfigurationError::TypeRequired);
        }

        let method_name = method_name.into();
        if method_name.trim().is_empty() {
            return Err(ConfigurationError::MethodNameRequired);
        }

        Ok(Self {
            target_type,
            method_name,
            phase,
            order: DEFAULT_ORDER,
        })
    }

    pub fn startup(
        target_type: impl Into<TypeRef>,
        method_name: impl Into<String>,
    ) -> std::result::Result<Self, ConfigurationError> {
        Self::new(target_type, method_name, Phase::Startup)
    }

    pub fn exit(
        target_type: impl Into<TypeRef>,
        method_name: impl Into<String>,
    ) -> std::result::Result<Self, ConfigurationError> {
        Self::new(target_type, method_name, Phase::Exit)
    }

    /// Build a marker targeting an [`Activatable`] type
    pub fn for_type<T: Activatable>(
        method_name: impl Into<String>,
        phase: Phase,
    ) -> std::result::Result<Self, ConfigurationError> {
        Self::new(T::type_ref(), method_name, phase)
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn set_order(&mut self, order: i32) {
        self.order = order;
    }

    pub fn target_type(&self) -> &TypeRef {
        &self.target_type
    }

    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    /// Run the target method through `invoker`.
    ///
    /// Errors raised by the method itself are returned as they come.
    pub fn invoke(&self, invoker: &dyn MethodInvoker) -> Result<()> {
        tracing::debug!(
            "Invoking {}::{} ({}, order {})",
            self.target_type,
            self.method_name,
            self.phase,
            self.order
        );
        invoker.invoke(&self.target_type, &self.method_name)
    }
}
