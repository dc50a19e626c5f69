//! Invariant 8: if the first `get_adaptive()` raises, later calls raise
//! with the identical cause and never retry generation.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use common::{Greeter, Plain, root_director};
use extld::registry::{ClassBody, ClassRecord, Factory, InitFn};

#[test]
fn failed_adaptive_build_is_never_retried() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();

    let builds = Arc::new(AtomicUsize::new(0));
    let counter = builds.clone();
    let init: InitFn<dyn Greeter> = Arc::new(|_instance| {
        Err(extld::ExtensionError::build_failure("adaptive", "init always fails in this test"))
    });
    let record = ClassRecord {
        names: vec![],
        body: ClassBody::Adaptive(Factory::Plain(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Plain("adaptive")) as Box<dyn Greeter>
        }))),
        activate: None,
        order: 0,
        wire: None,
        init: Some(init),
        dispose: None,
        class_id: None,
    };
    loader.add(record).unwrap();

    let first = match loader.get_adaptive() {
        Err(e) => e,
        Ok(_) => panic!("expected get_adaptive() to fail"),
    };
    let second = match loader.get_adaptive() {
        Err(e) => e,
        Ok(_) => panic!("expected get_adaptive() to fail"),
    };

    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert_eq!(first.to_string(), second.to_string());
}
