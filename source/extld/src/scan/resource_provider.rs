use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// Replaces "classloader": the single external collaborator the scanner
/// consults for resource bytes. `root` is a strategy's directory prefix;
/// `contract` is the contract's stable name, forming the resource's
/// `root + contract` path. Returns `(source id, raw bytes)` pairs since a
/// root may be backed by more than one underlying source.
pub trait ResourceProvider: Send + Sync {
    fn manifests(&self, root: &str, contract: &str) -> Vec<(String, Vec<u8>)>;
}

/// Reads `base/root/contract` as a single file, if present.
pub struct FsResourceProvider {
    base: PathBuf,
}

impl FsResourceProvider {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl ResourceProvider for FsResourceProvider {
    fn manifests(&self, root: &str, contract: &str) -> Vec<(String, Vec<u8>)> {
        let path = self.base.join(root).join(contract);
        match fs::read(&path) {
            Ok(bytes) => vec![(path.display().to_string(), bytes)],
            Err(_) => Vec::new(),
        }
    }
}

/// An in-memory provider for tests: `(root, contract) -> [(source id, bytes)]`.
#[derive(Default)]
pub struct MapResourceProvider {
    entries: Mutex<HashMap<(String, String), Vec<(String, Vec<u8>)>>>,
}

impl MapResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, root: impl Into<String>, contract: impl Into<String>, source_id: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.entries
            .lock()
            .expect("map provider lock poisoned")
            .entry((root.into(), contract.into()))
            .or_default()
            .push((source_id.into(), content.into()));
    }
}

impl ResourceProvider for MapResourceProvider {
    fn manifests(&self, root: &str, contract: &str) -> Vec<(String, Vec<u8>)> {
        self.entries
            .lock()
            .expect("map provider lock poisoned")
            .get(&(root.to_string(), contract.to_string()))
            .cloned()
            .unwrap_or_default()
    }
}
