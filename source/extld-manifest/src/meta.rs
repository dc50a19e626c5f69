//! Metadata contracts that stand in for annotation-driven reflection: every
//! extension class carries a compile-time [`ExtensionMeta`] impl (usually
//! generated by `#[derive(ExtensionMeta)]` in `extld-macro`), and every
//! contract trait carries a compile-time [`ExtensionContract`] impl (usually
//! generated by `#[adaptive]`).

/// How an extension class participates in registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// An ordinary, independently named implementation.
    Named,
    /// The adaptive façade generator target for its contract.
    Adaptive,
    /// Wraps another instance of the same contract at build time.
    Wrapper,
}

/// The scope a contract resolves at, mirroring the director hierarchy a
/// lookup climbs through before giving up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Self_,
    Framework,
    Application,
    Module,
}

/// Normalized `@Activate`-equivalent metadata for one extension class:
/// the groups it activates under, the `(key, Option<value>)` URL-parameter
/// pairs gating activation, its relative order, and the FQDN sets it must
/// sort before/after.
#[derive(Debug, Clone, Default)]
pub struct ActivateMetadata {
    pub groups: Vec<&'static str>,
    pub pairs: Vec<(&'static str, Option<&'static str>)>,
    pub on_class: Vec<&'static str>,
    pub before: Vec<&'static str>,
    pub after: Vec<&'static str>,
    pub order: i32,
}

/// Compile-time metadata for one extension class, populated by
/// `#[derive(ExtensionMeta)]` from its `#[extension(...)]` attribute.
pub trait ExtensionMeta {
    /// Registration aliases; empty means "derive from the type name".
    const NAMES: &'static [&'static str];
    const CLASSIFICATION: Classification;
    const ORDER: i32;
    /// URL-parameter names this class's activation matches when present.
    const MATCHES: &'static [&'static str];
    /// URL-parameter names that must be absent for this class to activate.
    const MISMATCHES: &'static [&'static str];
    const GROUPS: &'static [&'static str];
    const ACTIVATE_PAIRS: &'static [(&'static str, Option<&'static str>)];
    const ON_CLASS: &'static [&'static str];
    const BEFORE: &'static [&'static str];
    const AFTER: &'static [&'static str];

    fn activate_metadata() -> ActivateMetadata {
        ActivateMetadata {
            groups: Self::GROUPS.to_vec(),
            pairs: Self::ACTIVATE_PAIRS.to_vec(),
            on_class: Self::ON_CLASS.to_vec(),
            before: Self::BEFORE.to_vec(),
            after: Self::AFTER.to_vec(),
            order: Self::ORDER,
        }
    }
}

/// Compile-time identity of a contract trait, populated by `#[adaptive]`
/// (or hand-written for contracts that skip the macro).
pub trait ExtensionContract {
    /// The stable identity used as the contract's SPI root for dispatch-key
    /// and strategy lookups.
    const CONTRACT_NAME: &'static str;
    const DEFAULT_NAME: Option<&'static str>;
    const SCOPE: Scope;
}
