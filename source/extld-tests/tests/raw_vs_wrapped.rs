//! Invariant 4: the raw and wrapped caches are genuinely separate — building
//! the raw instance first never populates the wrapped cell, and the two
//! calls return instances whose wrap chains differ.

mod common;

use common::{Greeter, Plain, named, root_director, wrapper};

#[test]
fn raw_and_wrapped_are_isolated() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader.add(named("x", || Box::new(Plain("x")))).unwrap();
    loader.add(wrapper("wrap1", 1, &[], &[])).unwrap();

    let raw_first = loader.get_raw("x").unwrap();
    assert_eq!(raw_first.hello(), "x");

    let wrapped = loader.get("x").unwrap();
    assert_eq!(wrapped.hello(), "wrap1(x)");

    // Asking for raw again still returns the un-wrapped instance: building
    // wrap=false first never seeded the wrapped cell.
    let raw_second = loader.get_raw("x").unwrap();
    assert_eq!(raw_second.hello(), "x");
}
