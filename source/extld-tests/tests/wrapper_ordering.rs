//! Invariant 3 / S3: wrappers nest outermost-highest-order-first, and a
//! `mismatches` entry excludes a wrapper from the chain it would otherwise
//! join.

mod common;

use common::{Greeter, Plain, named, root_director, wrapper};

#[test]
fn wrappers_nest_by_order_highest_first() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader.add(named("x", || Box::new(Plain("x")))).unwrap();
    loader.add(wrapper("wrap1", 1, &[], &[])).unwrap();
    loader.add(wrapper("wrap2", 2, &[], &[])).unwrap();

    let instance = loader.get("x").unwrap();
    assert_eq!(instance.hello(), "wrap2(wrap1(x))");
}

#[test]
fn mismatch_omits_wrapper_from_chain() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader.add(named("x", || Box::new(Plain("x")))).unwrap();
    loader.add(wrapper("wrap1", 1, &[], &["x"])).unwrap();
    loader.add(wrapper("wrap2", 2, &[], &[])).unwrap();

    let instance = loader.get("x").unwrap();
    assert_eq!(instance.hello(), "wrap2(x)");
}
