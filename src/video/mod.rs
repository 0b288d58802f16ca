//! Sign video lookup
//!
//! The video store is the source of truth for the sign vocabulary: the
//! semantic matcher is built from [`VideoStore::get_available_words`], so the
//! store must exist before the matcher.

mod filesystem;

pub use filesystem::{FileSystemVideoStore, DEFAULT_BASE_URL, DEFAULT_VIDEO_EXTENSION};

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

/// Outcome of looking up a single vocabulary word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoLookupResult {
    pub word: String,
    pub found: bool,
    /// Location of the asset, when found
    pub path: Option<PathBuf>,
    /// URL the client fetches the asset from, when found
    pub url: Option<String>,
}

impl VideoLookupResult {
    pub fn found(word: impl Into<String>, path: PathBuf, url: String) -> Self {
        Self {
            word: word.into(),
            found: true,
            path: Some(path),
            url: Some(url),
        }
    }

    pub fn missing(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            found: false,
            path: None,
            url: None,
        }
    }
}

/// Errors raised by video stores
#[derive(Debug, thiserror::Error)]
pub enum VideoStoreError {
    #[error("Failed to read video directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Video store unavailable: {0}")]
    Unavailable(String),
}

/// Contract for resolving vocabulary words to sign video assets.
///
/// Words passed in are already normalized (lowercase vocabulary form).
pub trait VideoStore: Send + Sync {
    fn video_exists(&self, word: &str) -> Result<bool, VideoStoreError>;

    fn find_video(&self, word: &str) -> Result<VideoLookupResult, VideoStoreError>;

    /// Every word with a video, sorted
    fn get_available_words(&self) -> Result<Arc<BTreeSet<String>>, VideoStoreError>;
}
