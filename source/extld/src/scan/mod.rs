//! The resource scanner: enumerates configuration files across configured
//! strategies and resource providers, and parses one entry per line into
//! `(name, class-ref)` records fed to a `ClassRegistry`.

mod cache;
mod resource_provider;
mod scanner;
mod strategy;

pub use resource_provider::{FsResourceProvider, MapResourceProvider, ResourceProvider};
pub use scanner::Scanner;
pub use strategy::builtin as builtin_strategies;
