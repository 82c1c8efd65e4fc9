//! # pokeglyph core
//!
//! The sprite-to-icon pipeline.
//!
//! This crate provides:
//! - Display name normalization to sprite slugs
//! - Catalog manifest parsing
//! - Half-block truecolor glyph conversion
//! - The on-disk icon store
//! - A single-line progress reporter
//! - The sequential fetch loop over a [`SpriteSource`]
//!
//! ```text
//!  ▄▀▀▄▄▀▀▄
//!  █ ▀▄▄▀ █   pokeglyph
//!   ▀▄▄▄▄▀    sprites for your terminal
//! ```

pub mod catalog;
pub mod error;
pub mod glyph;
pub mod pipeline;
pub mod progress;
pub mod slug;
pub mod source;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, Variant};
pub use error::{CoreError, Result};
pub use glyph::{GlyphConfig, GlyphRenderer, COLUMN_PADDING};
pub use pipeline::{ErrorPolicy, Pipeline, PipelineOptions, RunSummary};
pub use progress::Progress;
pub use slug::Slug;
pub use source::{SpriteSource, SpriteUrls};
pub use store::{IconStore, IconTarget};
