//! Error types for pokeglyph core

use thiserror::Error;

/// Result type for pokeglyph core operations
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types
#[derive(Error, Debug)]
pub enum CoreError {
    /// The catalog manifest could not be retrieved or understood
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// A sprite source failed for a specific URL
    #[error("Failed to fetch {url}: {reason}")]
    Source { url: String, reason: String },

    /// Run stopped on the first per-sprite failure
    #[error("Run aborted after failure on {0}")]
    Aborted(String),

    /// Slug cannot be used as a file name
    #[error("Slug {0:?} is not a safe file name")]
    UnsafeSlug(String),

    /// Stored icon not found
    #[error("Icon not found: {0}")]
    MissingIcon(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
