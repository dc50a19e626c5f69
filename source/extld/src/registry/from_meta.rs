use std::sync::Arc;

use extld_manifest::{Classification, ExtensionError, ExtensionMeta};

use super::record::{ClassBody, ClassRecord, Factory};

/// Builds a `ClassRecord` for a named or adaptive class from its
/// `#[derive(ExtensionMeta)]` metadata plus a zero-argument constructor —
/// the compile-time-registration counterpart of the source's reflective
/// read of a class's `@SPI`/`@Activate` annotations. Wrapper classes carry a
/// different factory shape (`Fn(Box<T>) -> Box<T>`) and aren't representable
/// by a zero-argument constructor; register those through `ClassBody::Wrapper`
/// directly instead of through this helper.
pub fn class_record_from_meta<T, C>(
    factory: impl Fn() -> Box<T> + Send + Sync + 'static,
) -> Result<ClassRecord<T>, ExtensionError>
where
    T: ?Sized,
    C: ExtensionMeta,
{
    if matches!(C::CLASSIFICATION, Classification::Wrapper) {
        return Err(ExtensionError::invalid_argument(
            "a wrapper classification cannot be built via class_record_from_meta; \
             register its `Fn(Box<T>) -> Box<T>` body through ClassBody::Wrapper directly",
        ));
    }

    let names: Vec<String> = C::NAMES.iter().map(|s| s.to_string()).collect();
    if names.is_empty() && matches!(C::CLASSIFICATION, Classification::Named) {
        return Err(ExtensionError::invalid_argument(
            "a named extension class must carry at least one name in its #[extension(names = \"...\")]",
        ));
    }

    let factory = Factory::Plain(Arc::new(factory));
    let body = match C::CLASSIFICATION {
        Classification::Adaptive => ClassBody::Adaptive(factory),
        Classification::Named => ClassBody::Named(factory),
        Classification::Wrapper => unreachable!("rejected above"),
    };

    let activate = C::activate_metadata();
    let activate = if activate.groups.is_empty() && activate.pairs.is_empty() && activate.on_class.is_empty() {
        None
    } else {
        Some(activate)
    };

    Ok(ClassRecord {
        names,
        body,
        activate,
        order: C::ORDER,
        wire: None,
        init: None,
        dispose: None,
        class_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Toy: Send + Sync {
        fn name(&self) -> &'static str;
    }

    struct ToyImpl;
    impl Toy for ToyImpl {
        fn name(&self) -> &'static str {
            "toy"
        }
    }

    struct NamedMeta;
    impl ExtensionMeta for NamedMeta {
        const NAMES: &'static [&'static str] = &["toy"];
        const CLASSIFICATION: Classification = Classification::Named;
        const ORDER: i32 = 5;
        const MATCHES: &'static [&'static str] = &[];
        const MISMATCHES: &'static [&'static str] = &[];
        const GROUPS: &'static [&'static str] = &[];
        const ACTIVATE_PAIRS: &'static [(&'static str, Option<&'static str>)] = &[];
        const ON_CLASS: &'static [&'static str] = &[];
        const BEFORE: &'static [&'static str] = &[];
        const AFTER: &'static [&'static str] = &[];
    }

    struct WrapperMeta;
    impl ExtensionMeta for WrapperMeta {
        const NAMES: &'static [&'static str] = &["wrap"];
        const CLASSIFICATION: Classification = Classification::Wrapper;
        const ORDER: i32 = 0;
        const MATCHES: &'static [&'static str] = &[];
        const MISMATCHES: &'static [&'static str] = &[];
        const GROUPS: &'static [&'static str] = &[];
        const ACTIVATE_PAIRS: &'static [(&'static str, Option<&'static str>)] = &[];
        const ON_CLASS: &'static [&'static str] = &[];
        const BEFORE: &'static [&'static str] = &[];
        const AFTER: &'static [&'static str] = &[];
    }

    struct UnnamedMeta;
    impl ExtensionMeta for UnnamedMeta {
        const NAMES: &'static [&'static str] = &[];
        const CLASSIFICATION: Classification = Classification::Named;
        const ORDER: i32 = 0;
        const MATCHES: &'static [&'static str] = &[];
        const MISMATCHES: &'static [&'static str] = &[];
        const GROUPS: &'static [&'static str] = &[];
        const ACTIVATE_PAIRS: &'static [(&'static str, Option<&'static str>)] = &[];
        const ON_CLASS: &'static [&'static str] = &[];
        const BEFORE: &'static [&'static str] = &[];
        const AFTER: &'static [&'static str] = &[];
    }

    #[test]
    fn builds_a_named_record_from_metadata() {
        let record = class_record_from_meta::<dyn Toy, NamedMeta>(|| Box::new(ToyImpl)).unwrap();
        assert_eq!(record.names, vec!["toy".to_string()]);
        assert_eq!(record.order, 5);
        assert!(matches!(record.body, ClassBody::Named(_)));
    }

    #[test]
    fn rejects_wrapper_classification() {
        let err = match class_record_from_meta::<dyn Toy, WrapperMeta>(|| Box::new(ToyImpl)) {
            Err(e) => e,
            Ok(_) => panic!("expected class_record_from_meta to fail"),
        };
        assert!(matches!(err, ExtensionError::InvalidArgument { .. }));
    }

    #[test]
    fn rejects_named_classification_with_no_names() {
        let err = match class_record_from_meta::<dyn Toy, UnnamedMeta>(|| Box::new(ToyImpl)) {
            Err(e) => e,
            Ok(_) => panic!("expected class_record_from_meta to fail"),
        };
        assert!(matches!(err, ExtensionError::InvalidArgument { .. }));
    }
}
