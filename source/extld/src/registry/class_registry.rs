use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use extld_manifest::{ExtensionContract, ExtensionError};
use tracing::error;

use super::record::{ClassBody, ClassRecord};

/// Per-contract class cache: at most one of {adaptive, wrapper, named} per
/// class, `name -> class` functional unless the name is flagged
/// unacceptable by a non-overriding collision. `unacceptable_names` keeps
/// the colliding classes' own identities so a later lookup can report which
/// two classes are ambiguous, not just that the name failed to resolve.
pub struct ClassRegistry<T: ExtensionContract + ?Sized> {
    named: Mutex<HashMap<String, Arc<ClassRecord<T>>>>,
    unacceptable_names: Mutex<HashMap<String, BTreeSet<String>>>,
    adaptive: Mutex<Option<Arc<ClassRecord<T>>>>,
    wrappers: Mutex<Vec<Arc<ClassRecord<T>>>>,
}

impl<T: ExtensionContract + ?Sized> Default for ClassRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ExtensionContract + ?Sized> ClassRegistry<T> {
    pub fn new() -> Self {
        Self {
            named: Mutex::new(HashMap::new()),
            unacceptable_names: Mutex::new(HashMap::new()),
            adaptive: Mutex::new(None),
            wrappers: Mutex::new(Vec::new()),
        }
    }

    /// Files one class record. `overridden` lets a later scan (a `user` or
    /// explicitly-overriding strategy) replace a prior binding for the same
    /// name instead of colliding with it.
    pub fn register(&self, record: ClassRecord<T>, overridden: bool) -> Result<(), ExtensionError> {
        let record = Arc::new(record);
        match &record.body {
            ClassBody::Adaptive(_) => {
                let mut slot = self.adaptive.lock().expect("registry lock poisoned");
                if slot.is_some() && !overridden {
                    return Err(ExtensionError::ambiguous(format!(
                        "two adaptive classes registered for contract `{}`",
                        T::CONTRACT_NAME
                    )));
                }
                *slot = Some(record);
                Ok(())
            }
            ClassBody::Wrapper(_) => {
                self.wrappers.lock().expect("registry lock poisoned").push(record);
                Ok(())
            }
            ClassBody::Named(_) => {
                if record.names.is_empty() {
                    return Err(ExtensionError::invalid_argument(
                        "a named extension class must carry at least one name",
                    ));
                }
                let mut named = self.named.lock().expect("registry lock poisoned");
                let mut unacceptable = self.unacceptable_names.lock().expect("registry lock poisoned");
                for alias in &record.names {
                    let existing = named.get(alias).filter(|existing| !Arc::ptr_eq(existing, &record)).cloned();
                    match existing {
                        Some(existing) if !overridden => {
                            let conflict = unacceptable.entry(alias.clone()).or_default();
                            conflict.insert(existing.identity().to_string());
                            conflict.insert(record.identity().to_string());
                            error!(
                                contract = T::CONTRACT_NAME,
                                name = %alias,
                                "duplicate extension registration without override"
                            );
                        }
                        _ => {
                            named.insert(alias.clone(), record.clone());
                            unacceptable.remove(alias);
                        }
                    }
                }
                Ok(())
            }
        }
    }

    pub fn default_name(&self) -> Option<&'static str> {
        T::DEFAULT_NAME
    }

    pub fn resolve(&self, name: &str) -> Option<Arc<ClassRecord<T>>> {
        if self.is_unacceptable(name) {
            return None;
        }
        self.named.lock().expect("registry lock poisoned").get(name).cloned()
    }

    pub fn is_unacceptable(&self, name: &str) -> bool {
        self.unacceptable_names.lock().expect("registry lock poisoned").contains_key(name)
    }

    /// The conflicting classes' own names when `name` was left unresolvable
    /// by a non-overriding collision, for an `Ambiguous` error message.
    pub fn ambiguous_classes(&self, name: &str) -> Option<Vec<String>> {
        self.unacceptable_names
            .lock()
            .expect("registry lock poisoned")
            .get(name)
            .map(|classes| classes.iter().cloned().collect())
    }

    pub fn adaptive(&self) -> Option<Arc<ClassRecord<T>>> {
        self.adaptive.lock().expect("registry lock poisoned").clone()
    }

    pub fn wrappers(&self) -> Vec<Arc<ClassRecord<T>>> {
        self.wrappers.lock().expect("registry lock poisoned").clone()
    }

    pub fn supported_names(&self) -> BTreeSet<String> {
        self.named.lock().expect("registry lock poisoned").keys().cloned().collect()
    }

    /// Every named class carrying activate metadata, as `(name, record)`.
    pub fn activate_candidates(&self) -> Vec<(String, Arc<ClassRecord<T>>)> {
        self.named
            .lock()
            .expect("registry lock poisoned")
            .iter()
            .filter(|(_, record)| record.activate.is_some())
            .map(|(name, record)| (name.clone(), record.clone()))
            .collect()
    }
}
