//! The non-macro half of adaptive dispatch: a reusable dispatch-key resolver
//! for contracts that hand-write their façade instead of deriving one with
//! `#[adaptive]` (object-safety edge cases, or exercising dispatch from a
//! crate that can't invoke the proc-macro on its own trait).

use extld_manifest::{ExtensionError, Url};

/// One method's dispatch rule: an ordered list of URL-parameter keys to try,
/// falling back to a default name when none are present.
pub struct MethodSpec {
    pub method: &'static str,
    pub keys: &'static [&'static str],
    pub default_name: Option<&'static str>,
}

/// Resolves a dispatch name for a method from a fixed table of
/// `MethodSpec`s, mirroring exactly the lookup the `#[adaptive]` macro
/// inlines into each generated method body.
pub struct TableDispatcher {
    methods: &'static [MethodSpec],
}

impl TableDispatcher {
    pub const fn new(methods: &'static [MethodSpec]) -> Self {
        Self { methods }
    }

    pub fn resolve(&self, method: &str, url: &Url) -> Result<String, ExtensionError> {
        let spec = self
            .methods
            .iter()
            .find(|m| m.method == method)
            .ok_or_else(|| ExtensionError::generator_failure(method))?;

        for key in spec.keys {
            if let Some(value) = url.parameter(key) {
                return Ok(value.to_string());
            }
        }
        spec.default_name
            .map(str::to_string)
            .ok_or_else(|| ExtensionError::generator_failure(method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_matching_key() {
        const METHODS: &[MethodSpec] =
            &[MethodSpec { method: "call", keys: &["protocol"], default_name: Some("dubbo") }];
        let dispatcher = TableDispatcher::new(METHODS);

        let url = Url::parse("svc?protocol=grpc");
        assert_eq!(dispatcher.resolve("call", &url).unwrap(), "grpc");

        let bare = Url::parse("svc");
        assert_eq!(dispatcher.resolve("call", &bare).unwrap(), "dubbo");
    }

    #[test]
    fn unknown_method_fails() {
        const METHODS: &[MethodSpec] = &[];
        let dispatcher = TableDispatcher::new(METHODS);
        assert!(dispatcher.resolve("missing", &Url::parse("x")).is_err());
    }
}
