//! Action registry: maps `(module, function)` string pairs to callables.
//!
//! Dispatch-by-string is kept at the wire level, but resolution goes
//! through an explicit registration table instead of reflection. The
//! registry consults its [`ModuleProvider`] on every resolve and caches
//! nothing, so a provider that swaps module tables between calls (the
//! live-reload seam) is honored on the very next invocation.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use uemcp_proto::ArgMap;

use crate::error::DispatchError;

/// A structured failure produced by an action or by argument validation.
///
/// `error_type` carries the failing error's own type name onto the wire;
/// `traceback` carries its formatted source chain when one exists.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionFailure {
    pub error_type: String,
    pub message: String,
    pub traceback: Option<String>,
}

impl ActionFailure {
    /// Creates a failure with no error chain.
    pub fn new(error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: message.into(),
            traceback: None,
        }
    }

    /// Creates a failure from an error value, formatting its source chain.
    pub fn from_error(error_type: impl Into<String>, err: &(dyn std::error::Error)) -> Self {
        let mut chain = Vec::new();
        chain.push(err.to_string());
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }
        Self {
            error_type: error_type.into(),
            message: err.to_string(),
            traceback: Some(chain.join("\n")),
        }
    }
}

/// Raw bytes returned by an action.
///
/// The wire contract obliges actions to produce a UTF-8 JSON string, but
/// actions are third-party-authored; the invoker validates the contract
/// instead of trusting it. Well-behaved actions build their output with
/// [`ActionOutput::json`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutput(Vec<u8>);

impl ActionOutput {
    /// Serializes a structured value into the action payload.
    pub fn json<T: Serialize>(value: &T) -> Result<Self, ActionFailure> {
        match serde_json::to_vec(value) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(e) => Err(ActionFailure::from_error("SerializationError", &e)),
        }
    }

    /// Wraps already-serialized text.
    pub fn text(text: impl Into<String>) -> Self {
        Self(text.into().into_bytes())
    }

    /// Wraps raw bytes. The invoker will reject non-UTF-8 content.
    pub fn raw(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Result of one action execution.
pub type ActionResult = Result<ActionOutput, ActionFailure>;

/// A registered callable. Receives the request's named-argument mapping.
pub type ActionFn = dyn Fn(&ArgMap) -> ActionResult + Send + Sync;

/// One logical action namespace: a named table of callables.
pub struct ActionModule {
    name: String,
    actions: BTreeMap<String, Arc<ActionFn>>,
}

impl ActionModule {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: BTreeMap::new(),
        }
    }

    /// Registers an action under a symbolic name.
    pub fn register<F>(&mut self, function: impl Into<String>, action: F)
    where
        F: Fn(&ArgMap) -> ActionResult + Send + Sync + 'static,
    {
        self.actions.insert(function.into(), Arc::new(action));
    }

    /// Builder-style registration.
    pub fn with_action<F>(mut self, function: impl Into<String>, action: F) -> Self
    where
        F: Fn(&ArgMap) -> ActionResult + Send + Sync + 'static,
    {
        self.register(function, action);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered action names, sorted.
    pub fn action_names(&self) -> Vec<&str> {
        self.actions.keys().map(String::as_str).collect()
    }

    /// Looks up a callable. Lookup is case-sensitive.
    pub fn get(&self, function: &str) -> Option<Arc<ActionFn>> {
        self.actions.get(function).cloned()
    }
}

impl std::fmt::Debug for ActionModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionModule")
            .field("name", &self.name)
            .field("actions", &self.action_names())
            .finish()
    }
}

/// Source of action modules, consulted on every resolve.
///
/// Providers may hand back a different table between calls; the registry
/// never caches what a provider returns.
pub trait ModuleProvider: Send + Sync {
    fn resolve(&self, module: &str) -> Option<Arc<ActionModule>>;
    fn module_names(&self) -> Vec<String>;
}

/// Fixed module table built at startup.
#[derive(Default)]
pub struct StaticModules {
    modules: BTreeMap<String, Arc<ActionModule>>,
}

impl StaticModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, module: ActionModule) {
        self.modules
            .insert(module.name().to_string(), Arc::new(module));
    }

    pub fn with_module(mut self, module: ActionModule) -> Self {
        self.insert(module);
        self
    }
}

impl ModuleProvider for StaticModules {
    fn resolve(&self, module: &str) -> Option<Arc<ActionModule>> {
        self.modules.get(module).cloned()
    }

    fn module_names(&self) -> Vec<String> {
        self.modules.keys().cloned().collect()
    }
}

/// Resolves `(module, function)` pairs against a [`ModuleProvider`].
pub struct ActionRegistry {
    provider: Box<dyn ModuleProvider>,
}

impl ActionRegistry {
    pub fn new(provider: impl ModuleProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Resolves a module by name.
    ///
    /// Names containing `..`, `/`, or `\` are rejected before any lookup is
    /// attempted, independent of whether a module of that literal name
    /// exists.
    pub fn resolve(&self, module: &str) -> Result<Arc<ActionModule>, DispatchError> {
        if module_name_escapes_namespace(module) {
            return Err(DispatchError::InvalidModuleName {
                module: module.to_string(),
            });
        }
        self.provider
            .resolve(module)
            .ok_or_else(|| DispatchError::ModuleNotFound {
                module: module.to_string(),
            })
    }

    /// Resolves a module, then a callable within it.
    pub fn resolve_action(
        &self,
        module: &str,
        function: &str,
    ) -> Result<Arc<ActionFn>, DispatchError> {
        let resolved = self.resolve(module)?;
        resolved
            .get(function)
            .ok_or_else(|| DispatchError::FunctionNotFound {
                module: module.to_string(),
                function: function.to_string(),
            })
    }

    /// Registered module names, sorted.
    pub fn module_names(&self) -> Vec<String> {
        self.provider.module_names()
    }
}

fn module_name_escapes_namespace(name: &str) -> bool {
    name.contains("..") || name.contains('/') || name.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_registry() -> ActionRegistry {
        let module = ActionModule::new("actor_actions").with_action("ue_select_all", |_args| {
            Ok(ActionOutput::text(r#"{"success":true}"#))
        });
        ActionRegistry::new(StaticModules::new().with_module(module))
    }

    #[test]
    fn resolves_registered_action() {
        let registry = test_registry();
        assert!(registry
            .resolve_action("actor_actions", "ue_select_all")
            .is_ok());
    }

    #[test]
    fn unknown_module_is_module_not_found() {
        let registry = test_registry();
        let err = registry.resolve("ghost_actions").unwrap_err();
        assert!(matches!(err, DispatchError::ModuleNotFound { .. }));
    }

    #[test]
    fn module_lookup_is_case_sensitive() {
        // No case-insensitive fallback: a name differing only by letter
        // case must fail like any other unknown module.
        let registry = test_registry();
        let err = registry.resolve("Actor_Actions").unwrap_err();
        assert!(matches!(err, DispatchError::ModuleNotFound { .. }));
    }

    #[test]
    fn path_escaping_names_rejected_before_lookup() {
        let registry = test_registry();
        for name in ["../../etc", "actor/actions", "actor\\actions", ".."] {
            let err = registry.resolve(name).unwrap_err();
            assert!(
                matches!(err, DispatchError::InvalidModuleName { .. }),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn escape_check_wins_even_for_registered_lookalikes() {
        // Even if a provider claimed to know such a name, the reject
        // happens first.
        struct Permissive;
        impl ModuleProvider for Permissive {
            fn resolve(&self, module: &str) -> Option<Arc<ActionModule>> {
                Some(Arc::new(ActionModule::new(module)))
            }
            fn module_names(&self) -> Vec<String> {
                Vec::new()
            }
        }
        let registry = ActionRegistry::new(Permissive);
        assert!(registry.resolve("../../etc").is_err());
        assert!(registry.resolve("anything_else").is_ok());
    }

    #[test]
    fn missing_function_is_function_not_found() {
        let registry = test_registry();
        let err = registry
            .resolve_action("actor_actions", "ue_vanish")
            .err()
            .unwrap();
        assert!(matches!(err, DispatchError::FunctionNotFound { .. }));
    }

    #[test]
    fn failure_from_error_formats_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let failure = ActionFailure::from_error("IoError", &io);
        assert_eq!(failure.error_type, "IoError");
        assert!(failure.traceback.unwrap().contains("disk on fire"));
    }

    #[test]
    fn provider_is_consulted_on_every_resolve() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(Arc<AtomicUsize>);
        impl ModuleProvider for Counting {
            fn resolve(&self, module: &str) -> Option<Arc<ActionModule>> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Some(Arc::new(ActionModule::new(module)))
            }
            fn module_names(&self) -> Vec<String> {
                Vec::new()
            }
        }

        let count = Arc::new(AtomicUsize::new(0));
        let registry = ActionRegistry::new(Counting(Arc::clone(&count)));
        registry.resolve("util_actions").unwrap();
        registry.resolve("util_actions").unwrap();
        registry.resolve("util_actions").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3, "resolves must not be cached");
    }
}
