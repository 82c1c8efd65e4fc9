//! # pokeglyph fetch
//!
//! Blocking HTTP implementation of [`SpriteSource`]: the catalog manifest
//! comes from one JSON URL, sprites are PNGs decoded to RGBA8.
//!
//! There is no retry. A timeout, a 404 and a corrupt PNG all surface as a
//! [`FetchError`] for that URL.

pub mod client;

pub use client::{ClientOptions, HttpSource};

use pokeglyph_core::CoreError;
use thiserror::Error;

/// Fetch-related errors
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Could not decode image from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: image::ImageError,
    },

    #[error("Could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl FetchError {
    /// URL the error is about, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Status { url, .. }
            | FetchError::Transport { url, .. }
            | FetchError::Decode { url, .. } => Some(url),
            FetchError::Client(_) => None,
        }
    }
}

impl From<FetchError> for CoreError {
    fn from(err: FetchError) -> Self {
        match err.url() {
            Some(url) => CoreError::Source {
                url: url.to_string(),
                reason: err.to_string(),
            },
            None => CoreError::Catalog(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, FetchError>;
