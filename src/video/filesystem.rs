//! Video store over a local directory of `<word>.<ext>` files

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use super::{VideoLookupResult, VideoStore, VideoStoreError};

/// URL prefix the video directory is served under
pub const DEFAULT_BASE_URL: &str = "/signs";

pub const DEFAULT_VIDEO_EXTENSION: &str = "mp4";

/// Available-word cache state
#[derive(Debug, Clone, Default)]
enum WordCache {
    #[default]
    Unpopulated,
    Populated(Arc<WordIndex>),
}

/// One directory scan: vocabulary words and the file each was read from
#[derive(Debug, Default)]
struct WordIndex {
    words: Arc<BTreeSet<String>>,
    /// Lowercased word -> file name as found on disk (`Hello.MP4`)
    files: BTreeMap<String, String>,
}

/// Filesystem-backed video store
///
/// The available-word list is scanned on first use and cached for the
/// lifetime of the store; call [`FileSystemVideoStore::refresh`] to rescan.
#[derive(Debug)]
pub struct FileSystemVideoStore {
    videos_dir: PathBuf,
    base_url: String,
    extension: String,
    cache: RwLock<WordCache>,
}

impl FileSystemVideoStore {
    pub fn new(videos_dir: impl Into<PathBuf>) -> Self {
        Self::with_base_url(videos_dir, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(videos_dir: impl Into<PathBuf>, base_url: &str) -> Self {
        Self {
            videos_dir: videos_dir.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
            extension: DEFAULT_VIDEO_EXTENSION.to_string(),
            cache: RwLock::new(WordCache::Unpopulated),
        }
    }

    pub fn videos_dir(&self) -> &Path {
        &self.videos_dir
    }

    /// Rescan the directory and atomically replace the cached word list
    pub fn refresh(&self) -> Result<Arc<BTreeSet<String>>, VideoStoreError> {
        let index = Arc::new(self.scan()?);
        let mut cache = self.cache.write().map_err(poisoned)?;
        *cache = WordCache::Populated(Arc::clone(&index));
        info!(
            count = index.words.len(),
            "Video word list refreshed from {}",
            self.videos_dir.display()
        );
        Ok(Arc::clone(&index.words))
    }

    /// Number of words with a video
    pub fn word_count(&self) -> Result<usize, VideoStoreError> {
        Ok(self.get_available_words()?.len())
    }

    /// File name holding `word`'s video, if any.
    ///
    /// `<word>.<ext>` is checked directly; otherwise the scanned index supplies
    /// the on-disk spelling of mixed-case assets such as `Hello.MP4`.
    fn video_file(&self, word: &str) -> Result<Option<String>, VideoStoreError> {
        // Words are vocabulary keys, never paths
        if word.is_empty() || word.contains(['/', '\\']) || word.contains("..") {
            return Ok(None);
        }

        let direct = format!("{}.{}", word, self.extension);
        if self.videos_dir.join(&direct).is_file() {
            return Ok(Some(direct));
        }

        let index = self.index()?;
        Ok(index
            .files
            .get(word)
            .filter(|name| self.videos_dir.join(name).is_file())
            .cloned())
    }

    /// Cached scan, populated on first use
    fn index(&self) -> Result<Arc<WordIndex>, VideoStoreError> {
        if let WordCache::Populated(index) = &*self.cache.read().map_err(poisoned)? {
            return Ok(Arc::clone(index));
        }

        // Re-check under the write lock so concurrent callers scan once
        let mut cache = self.cache.write().map_err(poisoned)?;
        if let WordCache::Populated(index) = &*cache {
            return Ok(Arc::clone(index));
        }
        let index = Arc::new(self.scan()?);
        info!(
            count = index.words.len(),
            "Loaded video word list from {}",
            self.videos_dir.display()
        );
        *cache = WordCache::Populated(Arc::clone(&index));
        Ok(index)
    }

    fn scan(&self) -> Result<WordIndex, VideoStoreError> {
        if !self.videos_dir.is_dir() {
            debug!("Video directory {} does not exist", self.videos_dir.display());
            return Ok(WordIndex::default());
        }

        let read_dir_err = |source| VideoStoreError::ReadDir {
            path: self.videos_dir.clone(),
            source,
        };

        let mut files = BTreeMap::new();
        for entry in std::fs::read_dir(&self.videos_dir).map_err(read_dir_err)? {
            let path = entry.map_err(read_dir_err)?.path();
            let has_extension = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(&self.extension));
            if !has_extension || !path.is_file() {
                continue;
            }
            let (Some(stem), Some(name)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.file_name().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            let word = stem.to_lowercase();
            // `hello.mp4` wins over `Hello.mp4` regardless of listing order
            let canonical = name == format!("{}.{}", word, self.extension);
            if canonical || !files.contains_key(&word) {
                files.insert(word, name.to_string());
            }
        }

        Ok(WordIndex {
            words: Arc::new(files.keys().cloned().collect()),
            files,
        })
    }
}

impl VideoStore for FileSystemVideoStore {
    fn video_exists(&self, word: &str) -> Result<bool, VideoStoreError> {
        Ok(self.video_file(word)?.is_some())
    }

    fn find_video(&self, word: &str) -> Result<VideoLookupResult, VideoStoreError> {
        match self.video_file(word)? {
            Some(name) => {
                let path = self.videos_dir.join(&name);
                let url = format!("{}/{}", self.base_url, name);
                Ok(VideoLookupResult::found(word, path, url))
            }
            None => Ok(VideoLookupResult::missing(word)),
        }
    }

    fn get_available_words(&self) -> Result<Arc<BTreeSet<String>>, VideoStoreError> {
        Ok(Arc::clone(&self.index()?.words))
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> VideoStoreError {
    VideoStoreError::Unavailable("word cache lock poisoned".into())
}
