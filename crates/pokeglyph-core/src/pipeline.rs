//! Fetch loop
//!
//! Walks the catalog in manifest order and produces one icon per
//! (entry, variant), then the unknown placeholder. Everything runs
//! sequentially on the calling thread.

use crate::catalog::{CatalogEntry, Variant};
use crate::error::{CoreError, Result};
use crate::glyph::GlyphRenderer;
use crate::progress::Progress;
use crate::source::{SpriteSource, SpriteUrls};
use crate::store::{IconStore, IconTarget};
use std::io::Write;

/// What to do when a single sprite cannot be fetched or decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log it, count it, move on
    #[default]
    Skip,
    /// Stop the run
    Abort,
}

/// Run options
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Leave existing icon files alone and skip their requests
    pub resume: bool,
    /// Per-sprite failure handling
    pub on_error: ErrorPolicy,
    /// Only process the first N catalog entries
    pub limit: Option<usize>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            resume: true,
            on_error: ErrorPolicy::Skip,
            limit: None,
        }
    }
}

/// Outcome counts of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files this run is responsible for: two per entry plus the placeholder
    pub expected: usize,
    /// Files written by this run
    pub written: usize,
    /// Files left in place because they already existed
    pub present: usize,
    /// Sprites that could not be fetched or decoded
    pub failed: usize,
}

impl RunSummary {
    /// Icons available after the run
    pub fn produced(&self) -> usize {
        self.written + self.present
    }

    pub fn is_complete(&self) -> bool {
        self.produced() == self.expected
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.produced(), self.expected)
    }
}

/// Catalog to icon files
pub struct Pipeline {
    urls: SpriteUrls,
    renderer: GlyphRenderer,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(urls: SpriteUrls, options: PipelineOptions) -> Self {
        Self {
            urls,
            renderer: GlyphRenderer::new(),
            options,
        }
    }

    /// Run the whole catalog.
    ///
    /// Catalog and filesystem errors end the run. Sprite errors are
    /// handled according to [`PipelineOptions::on_error`].
    pub fn run<S, W>(
        &self,
        source: &S,
        store: &IconStore,
        progress: &mut Progress<W>,
    ) -> Result<RunSummary>
    where
        S: SpriteSource + ?Sized,
        W: Write,
    {
        let mut catalog = source.catalog()?;
        if let Some(limit) = self.options.limit {
            catalog.truncate(limit);
        }
        tracing::info!(
            "Processing {} catalog entries into {}",
            catalog.len(),
            store.root().display()
        );

        let steps = catalog.len() + 1;
        let mut summary = RunSummary {
            expected: catalog.len() * Variant::all().len() + 1,
            ..RunSummary::default()
        };

        progress.update(0, steps, None);
        for (index, entry) in catalog.entries().iter().enumerate() {
            self.run_entry(entry, source, store, progress, &mut summary)?;
            let note = format!("{}/{} {}", index + 1, catalog.len(), entry.slug);
            progress.update(index + 1, steps, Some(&note));
        }

        self.produce(
            IconTarget::Unknown,
            &self.urls.unknown,
            source,
            store,
            progress,
            &mut summary,
        )?;
        progress.update(steps, steps, Some("unknown"));
        progress.finish();

        tracing::info!(
            "Done: {} icons ({} written, {} already present, {} failed)",
            summary,
            summary.written,
            summary.present,
            summary.failed
        );
        Ok(summary)
    }

    fn run_entry<S, W>(
        &self,
        entry: &CatalogEntry,
        source: &S,
        store: &IconStore,
        progress: &mut Progress<W>,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: SpriteSource + ?Sized,
        W: Write,
    {
        if !entry.slug.is_path_safe() {
            progress.finish();
            tracing::error!(
                "Skipping {:?}: slug {:?} is not a safe file name",
                entry.name,
                entry.slug.as_str()
            );
            summary.failed += Variant::all().len();
            if self.options.on_error == ErrorPolicy::Abort {
                return Err(CoreError::UnsafeSlug(entry.slug.to_string()));
            }
            return Ok(());
        }

        let unlisted = entry.slug.unlisted_chars();
        if !unlisted.is_empty() {
            progress.finish();
            tracing::warn!(
                "Slug {:?} for {:?} keeps unlisted characters {:?}; the remote file name may differ",
                entry.slug.as_str(),
                entry.name,
                unlisted
            );
        }

        for &variant in Variant::all() {
            let url = self.urls.sprite(variant, &entry.slug);
            let target = IconTarget::sprite(variant, &entry.slug);
            self.produce(target, &url, source, store, progress, summary)?;
        }
        Ok(())
    }

    fn produce<S, W>(
        &self,
        target: IconTarget,
        url: &str,
        source: &S,
        store: &IconStore,
        progress: &mut Progress<W>,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: SpriteSource + ?Sized,
        W: Write,
    {
        if self.options.resume && store.exists(&target) {
            tracing::debug!("Skipping {target}: already present");
            summary.present += 1;
            return Ok(());
        }

        tracing::debug!("Fetching {url}");
        match source.sprite(url) {
            Ok(img) => {
                let text = self.renderer.render(&img);
                store.write(&target, &text)?;
                summary.written += 1;
            }
            Err(e) => {
                // Keep the bar and the log line on separate lines
                progress.finish();
                tracing::error!("Failed to get {target} from {url}: {e}");
                summary.failed += 1;
                if self.options.on_error == ErrorPolicy::Abort {
                    return Err(CoreError::Aborted(url.to_string()));
                }
            }
        }
        Ok(())
    }
}
