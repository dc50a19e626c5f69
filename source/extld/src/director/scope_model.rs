use std::sync::Arc;

use crate::scan::ResourceProvider;

/// The single external collaborator the scanner consults: the set of
/// resource providers ("classloaders") a scope knows how to scan.
pub trait ScopeModel: Send + Sync {
    fn resource_providers(&self) -> Vec<Arc<dyn ResourceProvider>>;
}

/// A scope model with no resource providers of its own, useful for director
/// nodes that only ever receive programmatically-registered extensions.
pub struct EmptyScopeModel;

impl ScopeModel for EmptyScopeModel {
    fn resource_providers(&self) -> Vec<Arc<dyn ResourceProvider>> {
        Vec::new()
    }
}
