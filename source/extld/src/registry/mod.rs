//! The class registry: caches discovered extension classes per contract,
//! classifying each as named, adaptive, or wrapper, and resolving the
//! duplicate/override policy from a resource scan.

mod class_registry;
mod from_meta;
mod ordering;
mod record;

pub use class_registry::ClassRegistry;
pub use from_meta::class_record_from_meta;
pub use ordering::{OrderedNode, topo_sort};
pub use record::{ClassBody, ClassRecord, DisposeFn, Factory, InitFn, WireFn, WrapperBody, WrapperFn};
