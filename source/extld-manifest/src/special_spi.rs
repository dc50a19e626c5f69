use std::collections::HashMap;

use serde::Deserialize;

/// Replaces a `special_spi.properties` file: maps a contract name to the
/// single loading strategy it is restricted to, so contracts with their own
/// bespoke discovery rules don't get scanned under every strategy root.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SpecialSpiTable(HashMap<String, String>);

impl SpecialSpiTable {
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    pub fn from_toml(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// The strategy root a contract is restricted to, if any.
    pub fn restriction(&self, contract: &str) -> Option<&str> {
        self.0.get(contract).map(String::as_str)
    }

    pub fn insert(&mut self, contract: impl Into<String>, strategy: impl Into<String>) {
        self.0.insert(contract.into(), strategy.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_table() {
        let table = SpecialSpiTable::from_toml(
            r#"
            "greeter.contract" = "internal"
            "other.contract" = "user"
            "#,
        )
        .unwrap();
        assert_eq!(table.restriction("greeter.contract"), Some("internal"));
        assert_eq!(table.restriction("missing"), None);
    }
}
