use serde::Deserialize;

/// One root a resource scan walks, carrying the include/exclude filters and
/// priority that decide scan order and which contracts it applies to.
///
/// Deserializable from TOML so a deployment can add strategies beyond the
/// three built-ins without recompiling; built-ins are constructed directly
/// in Rust (see `extld::scan::strategy::builtin`) rather than shipped as
/// data, since they are part of the runtime's own bootstrap.
#[derive(Debug, Clone, Deserialize)]
pub struct LoadingStrategy {
    pub root: String,
    #[serde(default)]
    pub overridden: bool,
    #[serde(default)]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub extension_provider_only: Vec<String>,
    #[serde(default)]
    pub prefer_extension_provider: bool,
    #[serde(default)]
    pub priority: i32,
}

impl LoadingStrategy {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            overridden: false,
            include: Vec::new(),
            exclude: Vec::new(),
            extension_provider_only: Vec::new(),
            prefer_extension_provider: false,
            priority: 0,
        }
    }

    pub fn overridden(mut self, overridden: bool) -> Self {
        self.overridden = overridden;
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Whether this strategy admits the given manifest line's `fqcn`,
    /// honoring `include`/`exclude` (exclude wins on overlap) and
    /// `extension_provider_only` restricting admission further. Filters are
    /// package-prefix matches against the fqcn, not whole-contract matches —
    /// a strategy scans a contract's manifest line by line, admitting some
    /// classes and excluding others within the same file.
    pub fn applies_to(&self, fqcn: &str) -> bool {
        if self.exclude.iter().any(|c| fqcn.starts_with(c.as_str())) {
            return false;
        }
        if !self.include.is_empty() && !self.include.iter().any(|c| fqcn.starts_with(c.as_str())) {
            return false;
        }
        if !self.extension_provider_only.is_empty()
            && !self.extension_provider_only.iter().any(|c| fqcn.starts_with(c.as_str()))
        {
            return false;
        }
        true
    }
}

/// A deserializable set of strategies, e.g. loaded from a deployment's own
/// `loading_strategies.toml`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoadingStrategySet {
    #[serde(default, rename = "strategy")]
    pub strategies: Vec<LoadingStrategy>,
}
