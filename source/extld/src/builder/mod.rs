//! The instance builder: runs the construct → pre-hook → inject → post-hook
//! → wrap → lifecycle pipeline and maintains the named/raw/adaptive caches.

mod cell;
mod injector;
mod instance_builder;
mod post_processor;
mod wrapper;

pub use cell::Cell;
pub use injector::{InjectionContext, Injector, NullInjector};
pub use instance_builder::InstanceBuilder;
pub use post_processor::PostProcessor;
pub use wrapper::eligible_wrappers;
