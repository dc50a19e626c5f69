use std::sync::Arc;

use extld_manifest::ActivateMetadata;

/// Builds the raw, un-injected, un-wrapped instance. The scope-aware variant
/// stands in for the source's "one-argument construction strategy" special
/// case, since Rust has no single universal constructor signature to detect.
pub enum Factory<T: ?Sized> {
    Plain(Arc<dyn Fn() -> Box<T> + Send + Sync>),
    ScopeAware(Arc<dyn Fn(&dyn crate::director::ScopeModel) -> Box<T> + Send + Sync>),
}

impl<T: ?Sized> Clone for Factory<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Plain(f) => Self::Plain(f.clone()),
            Self::ScopeAware(f) => Self::ScopeAware(f.clone()),
        }
    }
}

pub type WrapperFn<T> = Arc<dyn Fn(Box<T>) -> Box<T> + Send + Sync>;
pub type WireFn<T> =
    Arc<dyn Fn(&mut Box<T>, &crate::builder::InjectionContext<'_>) -> Result<(), extld_manifest::ExtensionError> + Send + Sync>;
pub type InitFn<T> = Arc<dyn Fn(&T) -> Result<(), extld_manifest::ExtensionError> + Send + Sync>;
pub type DisposeFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct WrapperBody<T: ?Sized> {
    pub factory: WrapperFn<T>,
    pub matches: Vec<String>,
    pub mismatches: Vec<String>,
}

impl<T: ?Sized> Clone for WrapperBody<T> {
    fn clone(&self) -> Self {
        Self { factory: self.factory.clone(), matches: self.matches.clone(), mismatches: self.mismatches.clone() }
    }
}

impl<T: ?Sized> WrapperBody<T> {
    /// True when this wrapper is eligible to wrap the instance being built
    /// under `name`, per the source's match/mismatch filter.
    pub fn eligible_for(&self, name: &str) -> bool {
        let matched = self.matches.is_empty() || self.matches.iter().any(|m| m == name);
        let mismatched = self.mismatches.iter().any(|m| m == name);
        matched && !mismatched
    }
}

pub enum ClassBody<T: ?Sized> {
    Named(Factory<T>),
    Adaptive(Factory<T>),
    Wrapper(WrapperBody<T>),
}

impl<T: ?Sized> Clone for ClassBody<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(f) => Self::Named(f.clone()),
            Self::Adaptive(f) => Self::Adaptive(f.clone()),
            Self::Wrapper(w) => Self::Wrapper(w.clone()),
        }
    }
}

/// One extension class as filed in the registry: its aliases, how it
/// classifies, the metadata an activate-group query filters on, and the
/// pieces of the build pipeline it supplies (construction, wiring).
pub struct ClassRecord<T: ?Sized> {
    pub names: Vec<String>,
    pub body: ClassBody<T>,
    pub activate: Option<ActivateMetadata>,
    pub order: i32,
    pub wire: Option<WireFn<T>>,
    pub init: Option<InitFn<T>>,
    pub dispose: Option<DisposeFn<T>>,
    /// The underlying class identity a manifest line named (its `fqcn`),
    /// kept separate from `names` since a manifest entry can alias a class
    /// under a name that isn't derived from that identity at all. Used to
    /// name the actual colliding classes in an ambiguous-registration error
    /// rather than just repeating the alias both classes share.
    pub class_id: Option<String>,
}

impl<T: ?Sized> Clone for ClassRecord<T> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
            body: self.body.clone(),
            activate: self.activate.clone(),
            order: self.order,
            wire: self.wire.clone(),
            init: self.init.clone(),
            dispose: self.dispose.clone(),
            class_id: self.class_id.clone(),
        }
    }
}

impl<T: ?Sized> ClassRecord<T> {
    pub fn primary_name(&self) -> &str {
        self.names.first().map(String::as_str).unwrap_or("")
    }

    pub fn identity(&self) -> &str {
        self.class_id.as_deref().unwrap_or_else(|| self.primary_name())
    }

    pub fn is_wrapper(&self) -> bool {
        matches!(self.body, ClassBody::Wrapper(_))
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(self.body, ClassBody::Adaptive(_))
    }
}
