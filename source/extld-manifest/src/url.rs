use std::collections::BTreeMap;
use std::fmt;

/// A minimal invocation URL: a protocol/path pair plus the query-string
/// parameters adaptive dispatch reads to pick a concrete extension name.
/// Unlike a general-purpose URL type this never touches the network; it is
/// parsed once at a call boundary and carried by value through dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Url {
    protocol: Option<String>,
    path: String,
    parameters: BTreeMap<String, String>,
}

impl Url {
    pub fn new(path: impl Into<String>) -> Self {
        Self { protocol: None, path: path.into(), parameters: BTreeMap::new() }
    }

    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn with_parameter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Looks up a single query parameter by name.
    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }

    /// Parses `protocol://path?k=v&k=v`; the protocol and query string are
    /// both optional. Malformed `k=v` pairs (missing `=`) are skipped rather
    /// than rejecting the whole URL, matching the scanner's forgiving
    /// line-by-line failure policy.
    pub fn parse(raw: &str) -> Self {
        let (protocol, rest) = match raw.split_once("://") {
            Some((proto, rest)) => (Some(proto.to_string()), rest),
            None => (None, raw),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query)),
            None => (rest.to_string(), None),
        };
        let mut parameters = BTreeMap::new();
        if let Some(query) = query {
            for pair in query.split('&') {
                if let Some((k, v)) = pair.split_once('=') {
                    parameters.insert(k.to_string(), v.to_string());
                }
            }
        }
        Self { protocol, path, parameters }
    }
}

/// Implemented by a type that carries a dispatch [`Url`] without being one —
/// the accessor fallback adaptive dispatch falls back to when a method's
/// argument isn't a `&Url` directly.
pub trait HasUrl {
    fn url(&self) -> &Url;
}

impl HasUrl for Url {
    fn url(&self) -> &Url {
        self
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(protocol) = &self.protocol {
            write!(f, "{protocol}://")?;
        }
        write!(f, "{}", self.path)?;
        if !self.parameters.is_empty() {
            write!(f, "?")?;
            let mut first = true;
            for (k, v) in &self.parameters {
                if !first {
                    write!(f, "&")?;
                }
                first = false;
                write!(f, "{k}={v}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_protocol_path_and_params() {
        let url = Url::parse("dubbo://host/service?version=1.0&group=prod");
        assert_eq!(url.protocol(), Some("dubbo"));
        assert_eq!(url.path(), "host/service");
        assert_eq!(url.parameter("version"), Some("1.0"));
        assert_eq!(url.parameter("group"), Some("prod"));
        assert_eq!(url.parameter("missing"), None);
    }

    #[test]
    fn parses_bare_path() {
        let url = Url::parse("plain-path");
        assert_eq!(url.protocol(), None);
        assert_eq!(url.path(), "plain-path");
        assert_eq!(url.parameter("anything"), None);
    }

    #[test]
    fn skips_malformed_pairs() {
        let url = Url::parse("p?ok=1&broken&also=2");
        assert_eq!(url.parameter("ok"), Some("1"));
        assert_eq!(url.parameter("also"), Some("2"));
        assert_eq!(url.parameter("broken"), None);
    }

    #[test]
    fn round_trips_through_display() {
        let url = Url::new("svc").with_protocol("x").with_parameter("a", "1");
        assert_eq!(Url::parse(&url.to_string()).parameter("a"), Some("1"));
    }
}
