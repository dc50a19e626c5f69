use std::collections::{BTreeMap, HashMap};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ExtensionError;

static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:([^=\s]+)=)?([^?\s]+)(?:\?(.*))?$").expect("static pattern is valid")
});

/// One parsed line from a resource manifest: an optional explicit name
/// (absent for anonymous `fqcn`-only lines, resolved later against the
/// registered factory's own default name), the fully-qualified class path,
/// and any `?k=v&k=v` parameters attached to the line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: Option<String>,
    pub fqcn: String,
    pub parameters: BTreeMap<String, String>,
}

/// Strips a trailing `#...` comment and surrounding whitespace from one raw
/// manifest line. Returns `None` for lines that are blank or pure comments.
fn strip_comment(raw: &str) -> Option<&str> {
    let without_comment = match raw.find('#') {
        Some(idx) => &raw[..idx],
        None => raw,
    };
    let trimmed = without_comment.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// Parses one manifest line per the fixed grammar: `#...` comments stripped,
/// then either `name=fqcn[?k=v&k=v]` or a bare `fqcn`. Returns `Ok(None)`
/// for blank/comment-only lines and `Err` for lines that don't match the
/// grammar at all (the caller records this against the line text and keeps
/// scanning; a malformed line never aborts the rest of the manifest).
pub fn parse_manifest_line(raw: &str) -> Result<Option<ManifestEntry>, ExtensionError> {
    let Some(line) = strip_comment(raw) else {
        return Ok(None);
    };

    let captures = LINE_PATTERN
        .captures(line)
        .ok_or_else(|| ExtensionError::invalid_argument(format!("malformed manifest line: {line}")))?;

    let name = captures.get(1).map(|m| m.as_str().to_string());
    let fqcn = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| ExtensionError::invalid_argument(format!("missing class path: {line}")))?;

    let mut parameters = BTreeMap::new();
    if let Some(query) = captures.get(3) {
        for pair in query.as_str().split('&') {
            if pair.is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((k, v)) => {
                    parameters.insert(k.to_string(), v.to_string());
                }
                None => {
                    return Err(ExtensionError::invalid_argument(format!(
                        "malformed parameter `{pair}` in line: {line}"
                    )));
                }
            }
        }
    }

    Ok(Some(ManifestEntry { name, fqcn, parameters }))
}

/// Accumulates per-line scan failures keyed by the failing line's text, so a
/// later `Unknown` lookup for a name can surface every scan error whose key
/// starts with that name (a single bad line rarely maps 1:1 to a lookup
/// name, since anonymous lines carry no name at all).
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    pub exceptions: HashMap<String, Vec<ExtensionError>>,
}

impl ScanReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: impl Into<String>, error: ExtensionError) {
        self.exceptions.entry(key.into()).or_default().push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.exceptions.is_empty()
    }

    /// Every recorded error whose key starts with `name`, rendered as
    /// strings for attachment to an `ExtensionError::Unknown`.
    pub fn errors_for(&self, name: &str) -> Vec<String> {
        self.exceptions
            .iter()
            .filter(|(key, _)| key.starts_with(name))
            .flat_map(|(_, errors)| errors.iter().map(ToString::to_string))
            .collect()
    }
}
