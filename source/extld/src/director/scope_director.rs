use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use extld_manifest::{ExtensionContract, ExtensionError, ScanReport, Scope};

use crate::builder::{InstanceBuilder, Injector, NullInjector, PostProcessor};
use crate::loader::Loader;
use crate::registry::ClassRegistry;
use crate::scan::Scanner;

use super::scope_model::ScopeModel;

/// The registry-and-builder pair a director owns for one extension
/// contract, plus the scan-failure report the builder consults when a
/// lookup misses.
pub struct Bundle<T: ExtensionContract + ?Sized + Send + Sync + 'static> {
    pub registry: Arc<ClassRegistry<T>>,
    pub builder: Arc<InstanceBuilder<T>>,
    pub scan_report: Arc<Mutex<ScanReport>>,
}

impl<T: ExtensionContract + ?Sized + Send + Sync + 'static> Bundle<T> {
    fn new(injector: Arc<dyn Injector>, post_processors: Vec<Arc<dyn PostProcessor<T>>>) -> Self {
        let registry = Arc::new(ClassRegistry::new());
        let scan_report = Arc::new(Mutex::new(ScanReport::new()));
        let builder = Arc::new(
            InstanceBuilder::new(registry.clone(), scan_report.clone())
                .with_injector(injector)
                .with_post_processors(post_processors),
        );
        Self { registry, builder, scan_report }
    }
}

type BuilderConfig<T> = (Arc<dyn Injector>, Vec<Arc<dyn PostProcessor<T>>>);

/// A node in the scope tree. Owns its registries and builders exclusively;
/// a lookup climbs the tree per `loader`'s resolution rules and the
/// resolved bundle is shared (not copied) with the querying descendant.
pub struct ScopeDirector {
    parent: Option<Arc<ScopeDirector>>,
    scope_tag: Scope,
    scope_model: Arc<dyn ScopeModel>,
    scanner: Arc<Scanner>,
    bundles: Mutex<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    builder_config: Mutex<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
    destroyers: Mutex<Vec<Arc<dyn Fn() + Send + Sync>>>,
    destroyed: AtomicBool,
}

impl ScopeDirector {
    pub fn root(scope_tag: Scope, scope_model: Arc<dyn ScopeModel>, scanner: Arc<Scanner>) -> Arc<Self> {
        Arc::new(Self {
            parent: None,
            scope_tag,
            scope_model,
            scanner,
            bundles: Mutex::new(HashMap::new()),
            builder_config: Mutex::new(HashMap::new()),
            destroyers: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
        })
    }

    pub fn child(self: &Arc<Self>, scope_tag: Scope, scope_model: Arc<dyn ScopeModel>) -> Arc<Self> {
        Arc::new(Self {
            parent: Some(self.clone()),
            scope_tag,
            scope_model,
            scanner: self.scanner.clone(),
            bundles: Mutex::new(HashMap::new()),
            builder_config: Mutex::new(HashMap::new()),
            destroyers: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
        })
    }

    /// Supplies the `Injector` and `PostProcessor`s this director's bundle
    /// for `T` builds with, in place of the `NullInjector`/empty-list
    /// defaults. Must run before the first `loader::<T>()` or `scan::<T>()`
    /// call creates the bundle; once created, a bundle's builder is fixed.
    pub fn configure_builder<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        &self,
        injector: Arc<dyn Injector>,
        post_processors: Vec<Arc<dyn PostProcessor<T>>>,
    ) -> Result<(), ExtensionError> {
        self.check_destroyed()?;
        if self.bundles.lock().expect("bundle map lock poisoned").contains_key(&TypeId::of::<T>()) {
            return Err(ExtensionError::invalid_argument(
                "cannot configure a contract's injector/post-processors after its bundle has already been created",
            ));
        }
        let config: BuilderConfig<T> = (injector, post_processors);
        self.builder_config
            .lock()
            .expect("builder config lock poisoned")
            .insert(TypeId::of::<T>(), Box::new(config) as Box<dyn Any + Send + Sync>);
        Ok(())
    }

    pub fn scope_tag(&self) -> Scope {
        self.scope_tag
    }

    pub fn scope_model(&self) -> Arc<dyn ScopeModel> {
        self.scope_model.clone()
    }

    pub fn scanner(&self) -> &Arc<Scanner> {
        &self.scanner
    }

    fn check_destroyed(&self) -> Result<(), ExtensionError> {
        if self.destroyed.load(Ordering::Acquire) {
            Err(ExtensionError::Destroyed)
        } else {
            Ok(())
        }
    }

    fn local_bundle<T: ExtensionContract + ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<Bundle<T>>> {
        self.bundles
            .lock()
            .expect("bundle map lock poisoned")
            .get(&TypeId::of::<T>())
            .cloned()
            .map(|any| any.downcast::<Bundle<T>>().expect("TypeId-keyed bundle has the wrong concrete type"))
    }

    fn create_local_bundle<T: ExtensionContract + ?Sized + Send + Sync + 'static>(&self) -> Arc<Bundle<T>> {
        let mut guard = self.bundles.lock().expect("bundle map lock poisoned");
        let is_new = !guard.contains_key(&TypeId::of::<T>());
        let bundle = guard
            .entry(TypeId::of::<T>())
            .or_insert_with(|| {
                let (injector, post_processors) = self
                    .builder_config
                    .lock()
                    .expect("builder config lock poisoned")
                    .remove(&TypeId::of::<T>())
                    .map(|boxed| {
                        *boxed.downcast::<BuilderConfig<T>>().expect("TypeId-keyed builder config has the wrong concrete type")
                    })
                    .unwrap_or_else(|| (Arc::new(NullInjector) as Arc<dyn Injector>, Vec::new()));
                Arc::new(Bundle::<T>::new(injector, post_processors)) as Arc<dyn Any + Send + Sync>
            })
            .clone()
            .downcast::<Bundle<T>>()
            .expect("TypeId-keyed bundle has the wrong concrete type");
        if is_new {
            let builder = bundle.builder.clone();
            self.destroyers.lock().expect("destroyer list lock poisoned").push(Arc::new(move || builder.destroy()));
        }
        bundle
    }

    /// Walks this director and its ancestors for an existing bundle for
    /// `T`, creating one at the first director whose own `scope_tag`
    /// matches `T::SCOPE`. Used by `loader` to implement steps 5-6 of the
    /// resolution algorithm.
    fn find_bundle<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        self: &Arc<Self>,
    ) -> Option<(Arc<Bundle<T>>, Arc<ScopeDirector>)> {
        if let Some(bundle) = self.local_bundle::<T>() {
            return Some((bundle, self.clone()));
        }
        if T::SCOPE == self.scope_tag {
            return Some((self.create_local_bundle::<T>(), self.clone()));
        }
        self.parent.as_ref().and_then(|p| p.find_bundle::<T>())
    }

    /// Resolves the `(Bundle, owning director)` pair for `T` per the
    /// six-step algorithm: local cache hit, then `Self`-scope always
    /// local, then an ancestor walk, then a local match on this director's
    /// own scope, else a resolution failure (the source tolerates a null
    /// here; this fails fast instead — an explicit, recorded decision).
    pub fn bundle<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        self: &Arc<Self>,
    ) -> Result<(Arc<Bundle<T>>, Arc<ScopeDirector>), ExtensionError> {
        self.check_destroyed()?;
        if let Some(bundle) = self.local_bundle::<T>() {
            return Ok((bundle, self.clone()));
        }
        if T::SCOPE == Scope::Self_ {
            return Ok((self.create_local_bundle::<T>(), self.clone()));
        }
        if let Some(parent) = &self.parent {
            if let Some(found) = parent.find_bundle::<T>() {
                return Ok(found);
            }
        }
        if T::SCOPE == self.scope_tag {
            return Ok((self.create_local_bundle::<T>(), self.clone()));
        }
        Err(ExtensionError::ScopeNotResolved)
    }

    /// `loader(T)`: the public entry point callers use to reach a
    /// contract's registry and builder.
    pub fn loader<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        self: &Arc<Self>,
    ) -> Result<Loader<T>, ExtensionError> {
        let (bundle, owner) = self.bundle::<T>()?;
        Ok(Loader::new(bundle, owner))
    }

    /// Runs the resource scanner for `T` against the owning director's
    /// scope model and `known_classes` registration table, filing results
    /// (and failures) directly into the resolved bundle. Stands in for the
    /// source's eager classpath scan on first access: here it is a
    /// deliberate, separately-triggered step since Rust's `known_classes`
    /// table is supplied by the caller rather than discovered.
    pub fn scan<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        self: &Arc<Self>,
        known_classes: &HashMap<&'static str, crate::registry::ClassRecord<T>>,
    ) -> Result<(), ExtensionError> {
        let (bundle, owner) = self.bundle::<T>()?;
        let providers = owner.scope_model.resource_providers();
        let mut report = bundle.scan_report.lock().expect("scan report lock poisoned");
        owner.scanner.scan(&bundle.registry, known_classes, &providers, &mut report);
        Ok(())
    }

    /// Idempotent: the first call disposes every built instance across
    /// every bundle this director owns and flips the destroyed flag;
    /// later calls are no-ops.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        for destroyer in self.destroyers.lock().expect("destroyer list lock poisoned").drain(..) {
            destroyer();
        }
        self.bundles.lock().expect("bundle map lock poisoned").clear();
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }
}
