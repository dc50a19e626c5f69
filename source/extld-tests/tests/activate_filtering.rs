//! Invariant 6 / S4: `get_activate` filters candidates by group and
//! URL-parameter match, and honors explicit `-name`/`-default` tokens.

mod common;

use common::{Greeter, Plain, named_with_activate, root_director};
use extld::{ActivateMetadata, Url};

fn candidate(groups: &'static [&'static str], pairs: &'static [(&'static str, Option<&'static str>)]) -> ActivateMetadata {
    ActivateMetadata { groups: groups.to_vec(), pairs: pairs.to_vec(), on_class: vec![], before: vec![], after: vec![], order: 0 }
}

#[test]
fn matching_group_and_pair_activates() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader
        .add(named_with_activate("c", || Box::new(Plain("c")), candidate(&["g1"], &[("k1", Some("v1"))])))
        .unwrap();

    let matching = Url::new("svc").with_parameter("k1", "v1");
    let names: Vec<_> = loader.get_activate(&matching, None, "g1").iter().map(|i| i.hello()).collect();
    assert_eq!(names, vec!["c"]);

    let mismatching = Url::new("svc").with_parameter("k1", "v2");
    let names: Vec<_> = loader.get_activate(&mismatching, None, "g1").iter().map(|i| i.hello()).collect();
    assert!(names.is_empty());
}

#[test]
fn explicit_minus_name_removes_candidate() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader
        .add(named_with_activate("c", || Box::new(Plain("c")), candidate(&["g1"], &[])))
        .unwrap();

    let url = Url::new("svc");
    let names: Vec<_> = loader.get_activate(&url, Some("-c"), "g1").iter().map(|i| i.hello()).collect();
    assert!(names.is_empty());
}

#[test]
fn minus_default_disables_autoselection() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader
        .add(named_with_activate("c", || Box::new(Plain("c")), candidate(&["g1"], &[])))
        .unwrap();

    let url = Url::new("svc");
    let names: Vec<_> = loader.get_activate(&url, Some("-default"), "g1").iter().map(|i| i.hello()).collect();
    assert!(names.is_empty());
}

#[test]
fn explicit_names_surround_the_default_sentinel() {
    let director = root_director();
    let loader = director.loader::<dyn Greeter>().unwrap();
    loader.add(named_with_activate("auto", || Box::new(Plain("auto")), candidate(&[], &[]))).unwrap();
    loader.add(common::named("before", || Box::new(Plain("before")))).unwrap();
    loader.add(common::named("after", || Box::new(Plain("after")))).unwrap();

    let url = Url::new("svc");
    let names: Vec<_> =
        loader.get_activate(&url, Some("before,default,after"), "").iter().map(|i| i.hello()).collect();
    assert_eq!(names, vec!["before", "auto", "after"]);
}
