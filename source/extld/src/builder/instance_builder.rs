use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use extld_manifest::{ExtensionContract, ExtensionError, ScanReport};
use tracing::{debug, warn};

use crate::director::ScopeDirector;
use crate::registry::{ClassBody, ClassRecord, ClassRegistry, Factory};

use super::cell::Cell;
use super::injector::{Injector, InjectionContext, NullInjector};
use super::post_processor::PostProcessor;
use super::wrapper::eligible_wrappers;

/// Constructs, injects, post-processes, wraps, and lifecycle-initialises
/// instances for one extension contract; maintains the named and raw
/// instance caches plus the single adaptive cell.
pub struct InstanceBuilder<T: ExtensionContract + ?Sized + Send + Sync + 'static> {
    registry: Arc<ClassRegistry<T>>,
    scan_report: Arc<Mutex<ScanReport>>,
    post_processors: Vec<Arc<dyn PostProcessor<T>>>,
    injector: Arc<dyn Injector>,
    wrapped: Mutex<HashMap<String, Arc<Cell<T>>>>,
    raw: Mutex<HashMap<String, Arc<Cell<T>>>>,
    adaptive_cell: Cell<T>,
    disposers: Mutex<Vec<(Arc<T>, crate::registry::DisposeFn<T>)>>,
    destroyed: AtomicBool,
}

impl<T: ExtensionContract + ?Sized + Send + Sync + 'static> InstanceBuilder<T> {
    pub fn new(registry: Arc<ClassRegistry<T>>, scan_report: Arc<Mutex<ScanReport>>) -> Self {
        Self {
            registry,
            scan_report,
            post_processors: Vec::new(),
            injector: Arc::new(NullInjector),
            wrapped: Mutex::new(HashMap::new()),
            raw: Mutex::new(HashMap::new()),
            adaptive_cell: Cell::new(),
            disposers: Mutex::new(Vec::new()),
            destroyed: AtomicBool::new(false),
        }
    }

    pub fn with_post_processors(mut self, post_processors: Vec<Arc<dyn PostProcessor<T>>>) -> Self {
        self.post_processors = post_processors;
        self
    }

    pub fn with_injector(mut self, injector: Arc<dyn Injector>) -> Self {
        self.injector = injector;
        self
    }

    fn check_destroyed(&self) -> Result<(), Arc<ExtensionError>> {
        if self.destroyed.load(Ordering::Acquire) {
            Err(Arc::new(ExtensionError::Destroyed))
        } else {
            Ok(())
        }
    }

    /// `get(name, wrap)`: returns the cached singleton, building on first
    /// access under that name's cell lock. Cached by the record's primary
    /// name rather than the literal `name` argument, so every alias of a
    /// class with `names: ["alpha", "a"]` shares one cell and one instance.
    pub fn get(&self, name: &str, wrap: bool, director: &Arc<ScopeDirector>) -> Result<Arc<T>, Arc<ExtensionError>> {
        self.check_destroyed()?;
        let record = self.resolve(name).map_err(Arc::new)?;
        let key = record.primary_name().to_string();
        let map = if wrap { &self.wrapped } else { &self.raw };
        let cell = {
            let mut guard = map.lock().expect("instance map lock poisoned");
            guard.entry(key).or_insert_with(|| Arc::new(Cell::new())).clone()
        };
        cell.get_or_build(|| self.build_from_record(&record, name, wrap, director))
    }

    pub fn has(&self, name: &str) -> bool {
        self.registry.resolve(name).is_some()
    }

    pub fn supported_names(&self) -> std::collections::BTreeSet<String> {
        self.registry.supported_names()
    }

    pub fn add(&self, record: ClassRecord<T>) -> Result<(), ExtensionError> {
        self.registry.register(record, false)
    }

    pub fn replace(&self, record: ClassRecord<T>) -> Result<(), ExtensionError> {
        self.registry.register(record, true)
    }

    /// `get_adaptive()`: the contract's single façade, sticky on failure.
    pub fn get_adaptive(&self, director: &Arc<ScopeDirector>) -> Result<Arc<T>, Arc<ExtensionError>> {
        self.check_destroyed()?;
        self.adaptive_cell.get_or_build(|| {
            let record = self.registry.adaptive().ok_or_else(|| {
                ExtensionError::build_failure(
                    T::CONTRACT_NAME,
                    "no adaptive extension registered for this contract",
                )
            })?;
            self.build_from_record(&record, record.primary_name(), false, director)
        })
    }

    fn resolve(&self, name: &str) -> Result<Arc<ClassRecord<T>>, ExtensionError> {
        self.registry.resolve(name).ok_or_else(|| {
            if let Some(classes) = self.registry.ambiguous_classes(name) {
                return ExtensionError::ambiguous(format!(
                    "name '{name}' is claimed by more than one class without an override: {}",
                    classes.join(", ")
                ));
            }
            let scan_errors = self.scan_report.lock().expect("scan report lock poisoned").errors_for(name);
            ExtensionError::unknown(name, scan_errors)
        })
    }

    fn build_from_record(
        &self,
        record: &Arc<ClassRecord<T>>,
        name: &str,
        wrap: bool,
        director: &Arc<ScopeDirector>,
    ) -> Result<Arc<T>, ExtensionError> {
        let factory = match &record.body {
            ClassBody::Named(f) | ClassBody::Adaptive(f) => f,
            ClassBody::Wrapper(_) => {
                return Err(ExtensionError::build_failure(name, "a wrapper cannot be built directly"));
            }
        };

        let mut instance = match factory {
            Factory::Plain(build) => build(),
            Factory::ScopeAware(build) => build(director.scope_model().as_ref()),
        };

        for pp in &self.post_processors {
            instance = pp.before(instance, name);
        }

        self.wire(record, &mut instance, director, name);

        for pp in &self.post_processors {
            instance = pp.after(instance, name);
        }

        if wrap {
            // `eligible_wrappers` orders highest-order first; apply in reverse so the
            // highest-order wrapper is the last one applied and ends up outermost.
            for wrapper in eligible_wrappers(&self.registry.wrappers(), name).into_iter().rev() {
                let ClassBody::Wrapper(body) = &wrapper.body else { continue };
                instance = (body.factory)(instance);
                self.wire(&wrapper, &mut instance, director, name);
                for pp in &self.post_processors {
                    instance = pp.after(instance, name);
                }
            }
        }

        if let Some(init) = &record.init {
            init(instance.as_ref()).map_err(|e| ExtensionError::build_failure(name, e.to_string()))?;
        }

        let instance: Arc<T> = Arc::from(instance);
        if let Some(dispose) = &record.dispose {
            self.disposers.lock().expect("disposer lock poisoned").push((instance.clone(), dispose.clone()));
        }
        debug!(name, contract = T::CONTRACT_NAME, "built extension instance");
        Ok(instance)
    }

    fn wire(&self, record: &ClassRecord<T>, instance: &mut Box<T>, director: &Arc<ScopeDirector>, name: &str) {
        if let Some(wire_fn) = &record.wire {
            let ctx = InjectionContext { director, injector: self.injector.as_ref() };
            if let Err(err) = wire_fn(instance, &ctx) {
                warn!(name, contract = T::CONTRACT_NAME, error = %err, "dependency injection failed; tolerating as optional");
            }
        }
    }

    /// Disposes every built instance exactly once and clears both caches;
    /// subsequent `get`/`get_adaptive` calls fail with `Destroyed`.
    pub fn destroy(&self) {
        if self.destroyed.swap(true, Ordering::AcqRel) {
            return;
        }
        for (instance, dispose) in self.disposers.lock().expect("disposer lock poisoned").drain(..) {
            dispose(instance.as_ref());
        }
        self.wrapped.lock().expect("instance map lock poisoned").clear();
        self.raw.lock().expect("instance map lock poisoned").clear();
        self.adaptive_cell.clear();
    }
}
