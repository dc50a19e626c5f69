use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use extld_manifest::{ExtensionError, ManifestEntry, parse_manifest_line};

pub type ParsedLine = (String, Result<Option<ManifestEntry>, ExtensionError>);
type CacheKey = (String, String, String);

/// Memoises a resource's parsed lines per `(source id, root, contract)`, a
/// bounded LRU since a process only scans each contract a handful of times
/// (startup plus any explicit rescans); correctness never depends on a hit.
pub struct LineCache {
    capacity: usize,
    entries: Mutex<HashMap<CacheKey, Vec<ParsedLine>>>,
    order: Mutex<VecDeque<CacheKey>>,
}

impl LineCache {
    pub fn new(capacity: usize) -> Self {
        Self { capacity, entries: Mutex::new(HashMap::new()), order: Mutex::new(VecDeque::new()) }
    }

    pub fn get_or_parse(&self, key: (String, String, String), raw: &[u8]) -> Vec<ParsedLine> {
        if let Some(cached) = self.entries.lock().expect("line cache lock poisoned").get(&key) {
            return cached.clone();
        }

        let text = String::from_utf8_lossy(raw);
        let parsed: Vec<ParsedLine> =
            text.lines().map(|line| (line.to_string(), parse_manifest_line(line))).collect();

        let mut entries = self.entries.lock().expect("line cache lock poisoned");
        let mut order = self.order.lock().expect("line cache lock poisoned");
        if entries.len() >= self.capacity {
            if let Some(oldest) = order.pop_front() {
                entries.remove(&oldest);
            }
        }
        entries.insert(key.clone(), parsed.clone());
        order.push_back(key);
        parsed
    }
}

impl Default for LineCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_parsed_lines() {
        let cache = LineCache::new(8);
        let key = ("src".to_string(), "root".to_string(), "contract".to_string());
        let first = cache.get_or_parse(key.clone(), b"a=pkg::A\n");
        let second = cache.get_or_parse(key, b"ignored on cache hit");
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
    }

    #[test]
    fn evicts_oldest_past_capacity() {
        let cache = LineCache::new(1);
        cache.get_or_parse(("a".into(), "r".into(), "c".into()), b"x=pkg::X\n");
        cache.get_or_parse(("b".into(), "r".into(), "c".into()), b"y=pkg::Y\n");
        assert_eq!(cache.entries.lock().unwrap().len(), 1);
    }
}
