//! Sprite catalog
//!
//! The manifest is a JSON object keyed by dex number:
//!
//! ```text
//! { "001": { "name": { "eng": "Bulbasaur", "jpn": "..." }, ... }, ... }
//! ```
//!
//! Only `name.eng` is read. Entries keep the manifest's key order.

use crate::error::{CoreError, Result};
use crate::slug::Slug;
use serde::Deserialize;

/// Rendering style of a sprite, selected by URL path segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Regular,
    Shiny,
}

impl Variant {
    /// Folder name used both remotely and in the icon store
    pub fn folder(&self) -> &'static str {
        match self {
            Variant::Regular => "regular",
            Variant::Shiny => "shiny",
        }
    }

    /// Get all variants in fetch order
    pub fn all() -> &'static [Variant] {
        &[Variant::Regular, Variant::Shiny]
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.folder())
    }
}

#[derive(Deserialize)]
struct RawEntry {
    name: RawName,
}

#[derive(Deserialize)]
struct RawName {
    eng: String,
}

/// One entity in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Manifest key
    pub key: String,
    /// English display name
    pub name: String,
    /// Slug derived from the display name
    pub slug: Slug,
}

impl CatalogEntry {
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: key.into(),
            slug: Slug::from_name(&name),
            name,
        }
    }
}

/// Ordered list of catalog entries, read once per run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Parse a manifest document
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let object = value
            .as_object()
            .ok_or_else(|| CoreError::Catalog("manifest is not a JSON object".to_string()))?;

        let mut entries = Vec::with_capacity(object.len());
        for (key, raw) in object {
            let raw: RawEntry = serde_json::from_value(raw.clone())
                .map_err(|e| CoreError::Catalog(format!("entry {key}: {e}")))?;
            entries.push(CatalogEntry::new(key.as_str(), raw.name.eng));
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the first `limit` entries
    pub fn truncate(&mut self, limit: usize) {
        self.entries.truncate(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "029": { "slug": { "eng": "nidoran-f" }, "name": { "eng": "Nidoran♀", "jpn": "ニドラン♀" } },
        "001": { "name": { "eng": "Bulbasaur" }, "gen-8": { "forms": {} } },
        "122": { "name": { "eng": "Mr. Mime" } }
    }"#;

    #[test]
    fn test_manifest_order_preserved() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let keys: Vec<&str> = catalog.entries().iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["029", "001", "122"]);
    }

    #[test]
    fn test_slugs_derived() {
        let catalog = Catalog::from_json(MANIFEST).unwrap();
        let slugs: Vec<&str> = catalog.entries().iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["nidoran-f", "bulbasaur", "mr-mime"]);
        assert_eq!(catalog.entries()[2].name, "Mr. Mime");
    }

    #[test]
    fn test_missing_name_is_error() {
        let err = Catalog::from_json(r#"{ "001": { "slug": {} } }"#).unwrap_err();
        assert!(matches!(err, CoreError::Catalog(_)));
        assert!(Catalog::from_json("[]").is_err());
    }

    #[test]
    fn test_truncate() {
        let mut catalog = Catalog::from_json(MANIFEST).unwrap();
        catalog.truncate(1);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].slug.as_str(), "nidoran-f");
    }

    #[test]
    fn test_variant_folders() {
        assert_eq!(Variant::Regular.folder(), "regular");
        assert_eq!(Variant::Shiny.to_string(), "shiny");
        assert_eq!(Variant::all().len(), 2);
    }
}
