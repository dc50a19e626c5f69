use std::any::Any;
use std::sync::Arc;

use crate::director::ScopeDirector;

/// External collaborator supplying dependency values by `(type, property)`.
/// Only this contract is specified; concrete IoC-container-backed injectors
/// are an out-of-scope collaborator.
pub trait Injector: Send + Sync {
    fn inject(&self, type_name: &str, property_name: &str) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// An injector that never supplies anything, used when no injector is
/// configured; every dependency is treated as optional per the swallow-and-log
/// contract.
pub struct NullInjector;

impl Injector for NullInjector {
    fn inject(&self, _type_name: &str, _property_name: &str) -> Option<Arc<dyn Any + Send + Sync>> {
        None
    }
}

/// Context handed to an extension's `wire` hook: typed lookups through the
/// injector, plus the owning director for collaborators that need to reach
/// further loaders themselves.
pub struct InjectionContext<'a> {
    pub director: &'a Arc<ScopeDirector>,
    pub injector: &'a dyn Injector,
}

impl<'a> InjectionContext<'a> {
    pub fn get<V: 'static + Send + Sync>(&self, property_name: &str) -> Option<Arc<V>> {
        self.injector
            .inject(std::any::type_name::<V>(), property_name)
            .and_then(|value| value.downcast::<V>().ok())
    }
}
