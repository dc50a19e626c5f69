use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use extld_manifest::{ExtensionContract, ExtensionError, Url};
use tracing::warn;

use crate::director::{Bundle, ScopeDirector};
use crate::registry::{ClassRecord, OrderedNode, topo_sort};

/// The public surface callers use to reach one contract's extensions: the
/// only boundary the rest of the system crosses into the core.
pub struct Loader<T: ExtensionContract + ?Sized + Send + Sync + 'static> {
    bundle: Arc<Bundle<T>>,
    director: Arc<ScopeDirector>,
}

impl<T: ExtensionContract + ?Sized + Send + Sync + 'static> Loader<T> {
    pub(crate) fn new(bundle: Arc<Bundle<T>>, director: Arc<ScopeDirector>) -> Self {
        Self { bundle, director }
    }

    /// Fatal on an unknown or unacceptable name.
    pub fn get(&self, name: &str) -> Result<Arc<T>, ExtensionError> {
        self.bundle.builder.get(name, true, &self.director).map_err(|e| (*e).clone())
    }

    /// Returns the raw, un-wrapped instance for `name`.
    pub fn get_raw(&self, name: &str) -> Result<Arc<T>, ExtensionError> {
        self.bundle.builder.get(name, false, &self.director).map_err(|e| (*e).clone())
    }

    /// `name`, or the contract's default name if `name` is absent from the
    /// registry. Any other failure still propagates.
    pub fn get_or_default(&self, name: &str) -> Result<Arc<T>, ExtensionError> {
        match self.get(name) {
            Err(ExtensionError::Unknown { .. }) => match self.get_default() {
                Some(result) => result,
                None => Err(ExtensionError::unknown(name, Vec::new())),
            },
            other => other,
        }
    }

    pub fn get_default(&self) -> Option<Result<Arc<T>, ExtensionError>> {
        T::DEFAULT_NAME.map(|name| self.get(name))
    }

    pub fn get_adaptive(&self) -> Result<Arc<T>, ExtensionError> {
        self.bundle.builder.get_adaptive(&self.director).map_err(|e| (*e).clone())
    }

    pub fn supported_names(&self) -> BTreeSet<String> {
        self.bundle.builder.supported_names()
    }

    pub fn has(&self, name: &str) -> bool {
        self.bundle.builder.has(name)
    }

    pub fn add(&self, record: ClassRecord<T>) -> Result<(), ExtensionError> {
        self.bundle.builder.add(record)
    }

    pub fn replace(&self, record: ClassRecord<T>) -> Result<(), ExtensionError> {
        self.bundle.builder.replace(record)
    }

    /// Normalises `names` (comma-separated, `+`/`-` prefixed), filters the
    /// registry's activate candidates by group and URL-parameter match, then
    /// places the auto-activated set relative to the caller's `default`
    /// sentinel before returning the built instances in order. Entries that
    /// fail to build are skipped and logged, not propagated.
    pub fn get_activate(&self, url: &Url, names: Option<&str>, group: &str) -> Vec<Arc<T>> {
        let tokens: Vec<&str> =
            names.unwrap_or("").split(',').map(str::trim).filter(|s| !s.is_empty()).collect();

        let disable_default = tokens.iter().any(|t| *t == "-default");
        let removed: HashSet<&str> =
            tokens.iter().filter(|t| t.starts_with('-')).map(|t| t.trim_start_matches('-')).collect();

        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut seen_default = false;
        for token in &tokens {
            if *token == "-default" || token.starts_with('-') {
                continue;
            }
            let clean = token.trim_start_matches('+');
            if clean == "default" {
                seen_default = true;
                continue;
            }
            if seen_default { after.push(clean) } else { before.push(clean) }
        }

        let auto_names = if disable_default { Vec::new() } else { self.auto_activated(url, group, &removed) };

        let mut ordered = Vec::new();
        ordered.extend(before.iter().map(|s| s.to_string()));
        ordered.extend(auto_names);
        ordered.extend(after.iter().map(|s| s.to_string()));

        let mut seen = HashSet::new();
        let mut instances = Vec::new();
        for name in ordered {
            if !seen.insert(name.clone()) {
                continue;
            }
            match self.get(&name) {
                Ok(instance) => instances.push(instance),
                Err(err) => warn!(name = name.as_str(), error = %err, "activate candidate failed to build; skipping"),
            }
        }
        instances
    }

    fn auto_activated(&self, url: &Url, group: &str, removed: &HashSet<&str>) -> Vec<String> {
        let candidates = self.bundle.registry.activate_candidates();
        let filtered: Vec<(String, extld_manifest::ActivateMetadata)> = candidates
            .into_iter()
            .filter(|(name, _)| !removed.contains(name.as_str()))
            .filter_map(|(name, record)| record.activate.clone().map(|activate| (name, activate)))
            .filter(|(_, activate)| group.is_empty() || activate.groups.iter().any(|g| *g == group))
            .filter(|(_, activate)| {
                activate.pairs.is_empty()
                    || activate.pairs.iter().any(|(k, v)| match v {
                        Some(v) => url.parameter(k) == Some(*v),
                        None => url.parameter(k).is_some_and(|p| !p.is_empty()),
                    })
            })
            .collect();

        let nodes: Vec<OrderedNode<'_>> = filtered
            .iter()
            .map(|(name, activate)| OrderedNode {
                name,
                order: activate.order,
                before: &activate.before,
                after: &activate.after,
            })
            .collect();
        topo_sort(&nodes)
    }
}
