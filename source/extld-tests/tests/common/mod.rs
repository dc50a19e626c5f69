//! Shared fixtures for the black-box tests: a toy `Greeter` contract plus
//! helpers to file named/wrapper `ClassRecord`s against it without going
//! through a real manifest scan, and a director tree with a root seeded by
//! an empty scope model.
#![allow(dead_code)]

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use extld::director::{EmptyScopeModel, ScopeDirector, ScopeModel};
use extld::registry::{ClassBody, ClassRecord, Factory, WrapperBody};
use extld::scan::{FsResourceProvider, ResourceProvider, Scanner};
use extld::{ActivateMetadata, ExtensionContract, Scope};

pub trait Greeter: Send + Sync {
    fn hello(&self) -> String;

    /// Lets a `wire` closure record an injected value on a fixture that
    /// supports it; no-op on fixtures that don't.
    fn set_note(&mut self, _note: String) {}

    fn note(&self) -> Option<String> {
        None
    }
}

impl ExtensionContract for dyn Greeter {
    const CONTRACT_NAME: &'static str = "greeter";
    const DEFAULT_NAME: Option<&'static str> = Some("p1");
    const SCOPE: Scope = Scope::Framework;
}

pub struct Plain(pub &'static str);

impl Greeter for Plain {
    fn hello(&self) -> String {
        self.0.to_string()
    }
}

/// A `Greeter` that bumps a shared counter on every construction, used to
/// assert a name is built exactly once under concurrent access.
pub struct Counting {
    pub label: &'static str,
    pub builds: Arc<AtomicUsize>,
}

impl Greeter for Counting {
    fn hello(&self) -> String {
        self.label.to_string()
    }
}

pub fn named(name: &str, factory: impl Fn() -> Box<dyn Greeter> + Send + Sync + 'static) -> ClassRecord<dyn Greeter> {
    ClassRecord {
        names: vec![name.to_string()],
        body: ClassBody::Named(Factory::Plain(Arc::new(factory))),
        activate: None,
        order: 0,
        wire: None,
        init: None,
        dispose: None,
        class_id: None,
    }
}

pub fn named_with_activate(
    name: &str,
    factory: impl Fn() -> Box<dyn Greeter> + Send + Sync + 'static,
    activate: ActivateMetadata,
) -> ClassRecord<dyn Greeter> {
    let mut record = named(name, factory);
    record.activate = Some(activate);
    record
}

/// A wrapper that prefixes the inner instance's greeting, so the type chain
/// from S3/invariant 3 is observable through the returned string.
pub fn wrapper(
    name: &str,
    order: i32,
    matches: &[&str],
    mismatches: &[&str],
) -> ClassRecord<dyn Greeter> {
    struct Wrapped {
        tag: &'static str,
        inner: Box<dyn Greeter>,
    }
    impl Greeter for Wrapped {
        fn hello(&self) -> String {
            format!("{}({})", self.tag, self.inner.hello())
        }
    }

    let tag: &'static str = Box::leak(name.to_string().into_boxed_str());
    ClassRecord {
        names: vec![name.to_string()],
        body: ClassBody::Wrapper(WrapperBody {
            factory: Arc::new(move |inner| Box::new(Wrapped { tag, inner })),
            matches: matches.iter().map(|s| s.to_string()).collect(),
            mismatches: mismatches.iter().map(|s| s.to_string()).collect(),
        }),
        activate: None,
        order,
        wire: None,
        init: None,
        dispose: None,
        class_id: None,
    }
}

pub fn root_director() -> Arc<ScopeDirector> {
    ScopeDirector::root(Scope::Framework, Arc::new(EmptyScopeModel), extld::bootstrap::default_scanner())
}

/// A scope model backed by a single filesystem root, for scanner tests.
struct FsScopeModel {
    base: std::path::PathBuf,
}

impl ScopeModel for FsScopeModel {
    fn resource_providers(&self) -> Vec<Arc<dyn ResourceProvider>> {
        vec![Arc::new(FsResourceProvider::new(self.base.clone()))]
    }
}

pub fn root_director_with_scanner(base: std::path::PathBuf, scanner: Scanner) -> Arc<ScopeDirector> {
    ScopeDirector::root(Scope::Framework, Arc::new(FsScopeModel { base }), Arc::new(scanner))
}

/// A scope model backed by an in-memory provider, for scanner tests that
/// don't need a real filesystem.
struct MapScopeModel {
    provider: Arc<extld::scan::MapResourceProvider>,
}

pub fn root_director_with_map_provider(
    provider: Arc<extld::scan::MapResourceProvider>,
    scanner: Scanner,
) -> Arc<ScopeDirector> {
    ScopeDirector::root(Scope::Framework, Arc::new(MapScopeModel { provider }), Arc::new(scanner))
}

impl ScopeModel for MapScopeModel {
    fn resource_providers(&self) -> Vec<Arc<dyn ResourceProvider>> {
        vec![self.provider.clone()]
    }
}

/// A second contract scoped `Self`, used alongside [`Greeter`] to contrast
/// scope-inherited sharing against per-director isolation.
pub trait SelfGreeter: Send + Sync {
    fn hello(&self) -> String;
}

impl ExtensionContract for dyn SelfGreeter {
    const CONTRACT_NAME: &'static str = "selfGreeter";
    const DEFAULT_NAME: Option<&'static str> = Some("p1");
    const SCOPE: Scope = Scope::Self_;
}

impl SelfGreeter for Plain {
    fn hello(&self) -> String {
        self.0.to_string()
    }
}

pub fn named_self(
    name: &str,
    factory: impl Fn() -> Box<dyn SelfGreeter> + Send + Sync + 'static,
) -> ClassRecord<dyn SelfGreeter> {
    ClassRecord {
        names: vec![name.to_string()],
        body: ClassBody::Named(Factory::Plain(Arc::new(factory))),
        activate: None,
        order: 0,
        wire: None,
        init: None,
        dispose: None,
        class_id: None,
    }
}
