use std::sync::{Arc, Mutex};

use extld_manifest::ExtensionError;

/// A lazily-produced singleton slot with sticky-failure semantics: at most
/// one concurrent build runs (the mutex is held for the build's duration),
/// and once built or failed the result is published for the cell's
/// lifetime. Used for named instance cells, raw-instance cells, and the
/// per-contract adaptive cell alike.
pub struct Cell<T: ?Sized> {
    state: Mutex<Option<Result<Arc<T>, Arc<ExtensionError>>>>,
}

impl<T: ?Sized> Default for Cell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Cell<T> {
    pub fn new() -> Self {
        Self { state: Mutex::new(None) }
    }

    /// Returns the cached result if present, otherwise runs `build` under
    /// the cell's lock and caches whatever it returns — success or failure
    /// — so later callers never retry.
    pub fn get_or_build(
        &self,
        build: impl FnOnce() -> Result<Arc<T>, ExtensionError>,
    ) -> Result<Arc<T>, Arc<ExtensionError>> {
        let mut guard = self.state.lock().expect("cell lock poisoned");
        if let Some(cached) = guard.clone() {
            return cached;
        }
        let result = build().map_err(Arc::new);
        *guard = Some(result.clone());
        result
    }

    pub fn get(&self) -> Option<Result<Arc<T>, Arc<ExtensionError>>> {
        self.state.lock().expect("cell lock poisoned").clone()
    }

    pub fn clear(&self) {
        *self.state.lock().expect("cell lock poisoned") = None;
    }
}
