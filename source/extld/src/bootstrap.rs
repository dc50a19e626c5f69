//! Seeds the self-hosting loop the scanner's own inputs go through: loading
//! strategies are themselves discovered via the same SPI mechanism they
//! configure, bootstrapped against a fixed built-in set so the loop has
//! somewhere to start.

use std::collections::HashMap;
use std::sync::Arc;

use extld_manifest::{ExtensionContract, LoadingStrategy, ScanReport, Scope, SpecialSpiTable};

use crate::registry::{ClassBody, ClassRecord, ClassRegistry, Factory};
use crate::scan::{ResourceProvider, Scanner, builtin_strategies};

/// Produces one strategy beyond the built-in three. A deployment that wants
/// further discovery roots registers a factory under this contract rather
/// than constructing a `Scanner` with a hand-assembled strategy list.
pub trait LoadingStrategyFactory: Send + Sync {
    fn build(&self) -> LoadingStrategy;
}

impl ExtensionContract for dyn LoadingStrategyFactory {
    const CONTRACT_NAME: &'static str = "loadingstrategy";
    const DEFAULT_NAME: Option<&'static str> = None;
    const SCOPE: Scope = Scope::Framework;
}

/// A scanner seeded with the three built-in strategies and an empty
/// special-SPI table, with no further discovery. Suitable whenever a
/// deployment registers no `LoadingStrategyFactory` of its own; equivalent
/// to [`bootstrap_scanner`] called against providers with nothing to find.
pub fn default_scanner() -> Arc<Scanner> {
    Arc::new(Scanner::new(builtin_strategies(), SpecialSpiTable::empty()))
}

/// Runs the self-hosting loop: scans `providers` for `loadingstrategy`
/// manifest entries using only the built-in strategy set, matching each
/// entry against `known_factories` the same way any other contract's
/// classes are matched against a `known_classes` table, then builds the
/// strategy list the real scanner will use from the built-ins plus
/// whatever was discovered, sorted by priority.
pub fn bootstrap_scanner(
    providers: &[Arc<dyn ResourceProvider>],
    known_factories: &HashMap<&'static str, ClassRecord<dyn LoadingStrategyFactory>>,
) -> Arc<Scanner> {
    let registry = ClassRegistry::<dyn LoadingStrategyFactory>::new();
    let bootstrap = Scanner::new(builtin_strategies(), SpecialSpiTable::empty());
    let mut report = ScanReport::new();
    bootstrap.scan(&registry, known_factories, providers, &mut report);

    let mut strategies = builtin_strategies();
    for name in registry.supported_names() {
        let Some(record) = registry.resolve(&name) else { continue };
        let ClassBody::Named(Factory::Plain(factory)) = &record.body else { continue };
        strategies.push(factory().build());
    }
    strategies.sort_by_key(|s| s.priority);

    Arc::new(Scanner::new(strategies, SpecialSpiTable::empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ExtraStrategy;
    impl LoadingStrategyFactory for ExtraStrategy {
        fn build(&self) -> LoadingStrategy {
            LoadingStrategy::new("extra/").priority(500)
        }
    }

    fn known_factories() -> HashMap<&'static str, ClassRecord<dyn LoadingStrategyFactory>> {
        let mut table: HashMap<&'static str, ClassRecord<dyn LoadingStrategyFactory>> = HashMap::new();
        table.insert(
            "crate::ExtraStrategy",
            ClassRecord {
                names: vec!["extra".to_string()],
                body: ClassBody::Named(Factory::Plain(Arc::new(|| Box::new(ExtraStrategy)))),
                activate: None,
                order: 0,
                wire: None,
                init: None,
                dispose: None,
                class_id: None,
            },
        );
        table
    }

    #[test]
    fn discovers_additional_strategy_and_keeps_builtins() {
        let provider = Arc::new(crate::scan::MapResourceProvider::new());
        provider.insert(
            "META-INF/dubbo/internal/",
            "loadingstrategy",
            "extra.txt",
            "extra=crate::ExtraStrategy",
        );
        let providers: Vec<Arc<dyn ResourceProvider>> = vec![provider];

        let scanner = bootstrap_scanner(&providers, &known_factories());
        let roots: Vec<&str> = scanner.strategies().iter().map(|s| s.root.as_str()).collect();
        assert_eq!(roots, vec!["META-INF/dubbo/internal/", "extra/", "META-INF/dubbo/", "META-INF/services/"]);
    }

    #[test]
    fn no_discovered_entries_keeps_only_builtins() {
        let providers: Vec<Arc<dyn ResourceProvider>> = Vec::new();
        let scanner = bootstrap_scanner(&providers, &known_factories());
        assert_eq!(scanner.strategies().len(), 3);
    }
}
