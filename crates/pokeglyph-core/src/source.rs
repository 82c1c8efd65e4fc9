//! Where catalogs and sprites come from

use crate::catalog::{Catalog, Variant};
use crate::error::Result;
use crate::slug::Slug;
use image::RgbaImage;

/// Provider of the catalog manifest and decoded sprites.
///
/// Calls block until the resource is available or has failed.
pub trait SpriteSource {
    /// Fetch and parse the catalog manifest
    fn catalog(&self) -> Result<Catalog>;

    /// Fetch and decode one sprite
    fn sprite(&self, url: &str) -> Result<RgbaImage>;
}

/// URL templates for sprite images
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteUrls {
    /// Base holding one folder per variant
    pub base: String,
    /// Placeholder sprite for unknown entities
    pub unknown: String,
}

impl SpriteUrls {
    pub fn new(base: impl Into<String>, unknown: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            unknown: unknown.into(),
        }
    }

    /// `<base>/<variant-folder>/<slug>.png`
    pub fn sprite(&self, variant: Variant, slug: &Slug) -> String {
        format!(
            "{}/{}/{}.png",
            self.base.trim_end_matches('/'),
            variant.folder(),
            slug
        )
    }
}
