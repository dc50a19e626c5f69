//! A scoped extension-point runtime: hierarchical resolution across a
//! director tree, composite instantiation through a fixed build pipeline,
//! and URL-driven adaptive dispatch.
//!
//! The single surface the rest of a system crosses into this crate is
//! [`director::ScopeDirector::loader`], returning a [`loader::Loader`] for
//! one extension contract.

pub mod adaptive;
pub mod bootstrap;
pub mod builder;
pub mod director;
pub mod loader;
pub mod registry;
pub mod scan;

pub use extld_manifest::{
    ActivateMetadata, Classification, ExtensionContract, ExtensionError, ExtensionMeta, ScanReport, Scope, Url,
};
pub use loader::Loader;
