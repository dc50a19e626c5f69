//! Invariant 1: concurrent `get(name)` from N threads builds the name's
//! extension exactly once and hands every caller the identical reference.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use common::{Counting, Greeter, named, root_director};

#[test]
fn concurrent_lookups_build_exactly_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();

    let counter = builds.clone();
    loader
        .add(named("slow", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Box::new(Counting { label: "slow", builds: Arc::new(AtomicUsize::new(0)) })
        }))
        .unwrap();

    const THREADS: usize = 16;
    let barrier = Arc::new(Barrier::new(THREADS));
    let loader = Arc::new(loader);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let loader = loader.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                loader.get("slow").unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    for instance in &results {
        assert!(Arc::ptr_eq(instance, &results[0]));
    }
}
