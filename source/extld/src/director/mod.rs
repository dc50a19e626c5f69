//! The scope director: a tree of directors, one per scope, owning the
//! per-contract registry/builder bundles and enforcing the scope-matching
//! resolution rules a lookup climbs through.

mod scope_director;
mod scope_model;

pub use scope_director::{Bundle, ScopeDirector};
pub use scope_model::{EmptyScopeModel, ScopeModel};
