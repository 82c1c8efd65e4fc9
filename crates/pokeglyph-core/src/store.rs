//! Icon store
//!
//! Generated icons live under one root directory:
//!
//! ```text
//! <root>/regular/<slug>.txt
//! <root>/shiny/<slug>.txt
//! <root>/unknown.txt
//! ```
//!
//! Writes go straight to the final path. An interrupted run leaves whatever
//! was already written, and a resumed run picks up the missing files.

use crate::catalog::Variant;
use crate::error::{CoreError, Result};
use crate::slug::Slug;
use std::path::{Path, PathBuf};

/// File name of the placeholder icon
pub const UNKNOWN_FILE: &str = "unknown.txt";

/// Identifies one output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconTarget {
    /// A catalog entry in one variant
    Sprite { variant: Variant, slug: Slug },
    /// The placeholder for unknown entities
    Unknown,
}

impl IconTarget {
    pub fn sprite(variant: Variant, slug: &Slug) -> Self {
        IconTarget::Sprite {
            variant,
            slug: slug.clone(),
        }
    }

    fn check(&self) -> Result<()> {
        match self {
            IconTarget::Sprite { slug, .. } if !slug.is_path_safe() => {
                Err(CoreError::UnsafeSlug(slug.to_string()))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for IconTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IconTarget::Sprite { variant, slug } => write!(f, "{variant}/{slug}"),
            IconTarget::Unknown => f.write_str("unknown"),
        }
    }
}

/// Directory of generated icon files
#[derive(Debug, Clone)]
pub struct IconStore {
    root: PathBuf,
}

impl IconStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a target inside the store
    pub fn path(&self, target: &IconTarget) -> PathBuf {
        match target {
            IconTarget::Sprite { variant, slug } => self
                .root
                .join(variant.folder())
                .join(format!("{slug}.txt")),
            IconTarget::Unknown => self.root.join(UNKNOWN_FILE),
        }
    }

    pub fn exists(&self, target: &IconTarget) -> bool {
        target.check().is_ok() && self.path(target).is_file()
    }

    /// Write an icon, creating directories as needed
    pub fn write(&self, target: &IconTarget, text: &str) -> Result<()> {
        target.check()?;
        let path = self.path(target);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, text)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    /// Read a stored icon
    pub fn read(&self, target: &IconTarget) -> Result<String> {
        target.check()?;
        let path = self.path(target);
        if !path.is_file() {
            return Err(CoreError::MissingIcon(path.display().to_string()));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}
