use crate::error::{ActivationError, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature of an exported activation method
pub type ActivationFn = fn() -> anyhow::Result<()>;

/// A registered activation method. Unlike [`ActivationFn`] it may capture state.
pub type MethodFn = Arc<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// Stable identifier of a type that owns activation methods
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The identifier an [`Activatable`] type registers under
    pub fn of<T: Activatable>() -> Self {
        T::type_ref()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeRef {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Finds and calls activation methods by name
///
/// The dispatcher only depends on this trait. [`TypeRegistry`] is the
/// in-process implementation.
pub trait MethodInvoker: Send + Sync {
    /// Call `target::method` with no arguments
    ///
    /// # Errors
    ///
    /// [`ActivationError::Lookup`] when the method is unknown,
    /// [`ActivationError::Invocation`] when the method itself fails. The
    /// method's own error is kept unchanged and is returned by
    /// [`std::error::Error::source`].
    fn invoke(&self, target: &TypeRef, method: &str) -> Result<()>;
}

/// Types exposing receiver-less activation methods
///
/// Usually implemented with the `#[activatable]` attribute on an `impl` block.
pub trait Activatable {
    fn type_ref() -> TypeRef;

    /// Every exported method with its name
    fn activation_methods() -> Vec<(&'static str, ActivationFn)>;
}

/// Converts what an activation method returns into a uniform result
pub trait IntoActivationResult {
    fn into_activation_result(self) -> anyhow::Result<()>;
}

impl IntoActivationResult for () {
    fn into_activation_result(self) -> anyhow::Result<()> {
        Ok(())
    }
}

impl<E> IntoActivationResult for std::result::Result<(), E>
where
    E: Into<anyhow::Error>,
{
    fn into_activation_result(self) -> anyhow::Result<()> {
        self.map_err(Into::into)
    }
}

/// Thread-safe table of activation methods, keyed by type then method name.
#[derive(Default)]
pub struct TypeRegistry {
    types: DashMap<TypeRef, HashMap<String, MethodFn>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            types: DashMap::new(),
        }
    }

    /// Register every exported method of `T`
    pub fn register<T: Activatable>(&self) -> &Self {
        let type_ref = T::type_ref();
        let methods = T::activation_methods();
        tracing::debug!("Registering {} activation method(s) of {}", methods.len(), type_ref);

        let mut entry = self.types.entry(type_ref).or_default();
        for (name, method) in methods {
            entry.insert(name.to_string(), Arc::new(method));
        }
        self
    }

    /// Register a single method, replacing any previous one with the same name
    pub fn register_fn<F>(
        &self,
        type_ref: impl Into<TypeRef>,
        method: impl Into<String>,
        f: F,
    ) -> &Self
    where
        F: Fn() -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.types
            .entry(type_ref.into())
            .or_default()
            .insert(method.into(), Arc::new(f));
        self
    }

    pub fn contains(&self, type_ref: &TypeRef, method: &str) -> bool {
        self.types
            .get(type_ref)
            .is_some_and(|methods| methods.contains_key(method))
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn find(&self, target: &TypeRef, method: &str) -> Option<MethodFn> {
        self.types
            .get(target)
            .and_then(|methods| methods.get(method).cloned())
    }
}

impl MethodInvoker for TypeRegistry {
    fn invoke(&self, target: &TypeRef, method: &str) -> Result<()> {
        // The map guard is released before calling: the method may register types.
        let callable = self
            .find(target, method)
            .ok_or_else(|| ActivationError::lookup(target.as_str(), method))?;

        callable().map_err(|source| {
            tracing::error!("{}::{} failed: {}", target, method, source);
            ActivationError::invocation(target.as_str(), method, source)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct Counter;

    impl Counter {
        fn bump() {
            COUNTER.fetch_add(1, Ordering::SeqCst);
        }

        fn refuse() -> std::result::Result<(), std::io::Error> {
            Err(std::io::Error::other("refused"))
        }
    }

    impl Activatable for Counter {
        fn type_ref() -> TypeRef {
            TypeRef::new("Counter")
        }

        fn activation_methods() -> Vec<(&'static str, ActivationFn)> {
            vec![
                ("bump", (|| Counter::bump().into_activation_result()) as ActivationFn),
                ("refuse", (|| Counter::refuse().into_activation_result()) as ActivationFn),
            ]
        }
    }

    #[test]
    fn test_register_and_invoke_activatable() {
        let registry = TypeRegistry::new();
        registry.register::<Counter>();
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&TypeRef::of::<Counter>(), "bump"));

        let before = COUNTER.load(Ordering::SeqCst);
        registry.invoke(&TypeRef::new("Counter"), "bump").unwrap();
        assert!(COUNTER.load(Ordering::SeqCst) > before);
    }

    #[test]
    fn test_method_error_is_wrapped_not_swallowed() {
        let registry = TypeRegistry::new();
        registry.register::<Counter>();

        let err = registry.invoke(&TypeRef::new("Counter"), "refuse").unwrap_err();
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("refused"));
        match err {
            ActivationError::Invocation {
                type_name,
                method,
                source,
            } => {
                assert_eq!(type_name, "Counter");
                assert_eq!(method, "refuse");
                assert_eq!(source.to_string(), "refused");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_type_or_method_is_a_lookup_error() {
        let registry = TypeRegistry::new();
        registry.register_fn("Known", "run", || Ok(()));

        assert!(registry.invoke(&TypeRef::new("Unknown"), "run").unwrap_err().is_lookup());
        assert!(registry.invoke(&TypeRef::new("Known"), "walk").unwrap_err().is_lookup());
    }

    #[test]
    fn test_register_fn_captures_state() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let registry = TypeRegistry::new();

        let sink = Arc::clone(&calls);
        registry.register_fn("Audit", "open", move || {
            sink.lock().unwrap().push("open");
            Ok(())
        });

        registry.invoke(&TypeRef::new("Audit"), "open").unwrap();
        registry.invoke(&TypeRef::new("Audit"), "open").unwrap();
        assert_eq!(*calls.lock().unwrap(), vec!["open", "open"]);
    }

    #[test]
    fn test_method_may_register_during_invocation() {
        let registry = Arc::new(TypeRegistry::new());
        let inner = Arc::clone(&registry);
        registry.register_fn("Outer", "run", move || {
            inner.register_fn("Outer", "late", || Ok(()));
            Ok(())
        });

        registry.invoke(&TypeRef::new("Outer"), "run").unwrap();
        assert!(registry.contains(&TypeRef::new("Outer"), "late"));
    }
}
