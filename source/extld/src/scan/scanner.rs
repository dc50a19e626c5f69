use std::collections::HashMap;

use extld_manifest::{ExtensionContract, ExtensionError, LoadingStrategy, ScanReport, SpecialSpiTable};

use crate::registry::{ClassRecord, ClassRegistry};

use super::cache::LineCache;
use super::resource_provider::ResourceProvider;

/// Drives the resource scanner's algorithm: for each strategy's root, read
/// every provider's manifest for the contract, parse it line by line, apply
/// the strategy's include/exclude/`extension_provider_only` filters to each
/// line's `fqcn` (not the whole contract — a manifest can mix admitted and
/// excluded classes), and register whichever pre-known class the admitted
/// lines name. There is no runtime class loading: `known_classes` is the
/// compile-time registration table (the same role `generate_registry!` plays
/// in the source) a line's fully-qualified path is matched against.
pub struct Scanner {
    strategies: Vec<LoadingStrategy>,
    special_spi: SpecialSpiTable,
    cache: LineCache,
}

impl Scanner {
    pub fn new(strategies: Vec<LoadingStrategy>, special_spi: SpecialSpiTable) -> Self {
        Self { strategies, special_spi, cache: LineCache::default() }
    }

    pub fn with_builtin_strategies() -> Self {
        Self::new(super::strategy::builtin(), SpecialSpiTable::empty())
    }

    pub fn strategies(&self) -> &[LoadingStrategy] {
        &self.strategies
    }

    pub fn scan<T: ExtensionContract + ?Sized + Send + Sync + 'static>(
        &self,
        registry: &ClassRegistry<T>,
        known_classes: &HashMap<&'static str, ClassRecord<T>>,
        providers: &[std::sync::Arc<dyn ResourceProvider>],
        report: &mut ScanReport,
    ) {
        let contract = T::CONTRACT_NAME;
        let restriction = self.special_spi.restriction(contract);

        for strategy in &self.strategies {
            if let Some(only) = restriction {
                if strategy.root != only {
                    continue;
                }
            }
            for provider in providers {
                for (source_id, bytes) in provider.manifests(&strategy.root, contract) {
                    let key = (source_id.clone(), strategy.root.clone(), contract.to_string());
                    for (line, parsed) in self.cache.get_or_parse(key, &bytes) {
                        match parsed {
                            Ok(None) => {}
                            Ok(Some(entry)) => {
                                if !strategy.applies_to(&entry.fqcn) {
                                    continue;
                                }
                                let Some(known) = known_classes.get(entry.fqcn.as_str()) else {
                                    report.record(
                                        entry.name.clone().unwrap_or_else(|| line.clone()),
                                        ExtensionError::invalid_argument(format!(
                                            "no registered class for `{}`",
                                            entry.fqcn
                                        )),
                                    );
                                    continue;
                                };
                                let mut record = known.clone();
                                record.class_id = Some(entry.fqcn.clone());
                                if let Some(name) = &entry.name {
                                    record.names = name
                                        .split(',')
                                        .map(str::trim)
                                        .filter(|s| !s.is_empty())
                                        .map(str::to_string)
                                        .collect();
                                }
                                if let Err(err) = registry.register(record, strategy.overridden) {
                                    let key = entry.name.clone().unwrap_or_else(|| entry.fqcn.clone());
                                    report.record(key, err);
                                }
                            }
                            Err(err) => report.record(line.clone(), err),
                        }
                    }
                }
            }
        }
    }
}
