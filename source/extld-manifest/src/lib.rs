//! Manifest data model for the extension-point runtime: the SPI resource-line
//! grammar, loading-strategy records, the special-SPI override table, the
//! compile-time metadata contracts extensions and their traits carry, and the
//! crate-wide error type.

mod error;
mod manifest;
mod meta;
mod special_spi;
mod strategy;
mod url;

pub use error::ExtensionError;
pub use manifest::{ManifestEntry, ScanReport, parse_manifest_line};
pub use meta::{ActivateMetadata, Classification, ExtensionContract, ExtensionMeta, Scope};
pub use special_spi::SpecialSpiTable;
pub use strategy::{LoadingStrategy, LoadingStrategySet};
pub use url::{HasUrl, Url};
