//! In-memory collaborators for pipeline and HTTP tests
//!
//! Each fake counts its calls and can be switched into a failing mode.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sign_semantic_matcher::{MatchResult, MatcherError, SemanticMatcher};
use signbridge::entity::{EntityDetector, EntityError, EntityInfo, FingerspellPolicy};
use signbridge::video::{VideoLookupResult, VideoStore, VideoStoreError};
use signbridge::TranslationService;

pub const THRESHOLD: f32 = 0.7;

/// Vocabulary plus a fixed nearest-neighbour table
#[derive(Default)]
pub struct FakeMatcher {
    vocabulary: Vec<String>,
    /// query word -> (vocabulary word, similarity)
    neighbours: HashMap<String, (String, f32)>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeMatcher {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_neighbour(mut self, word: &str, vocabulary_word: &str, similarity: f32) -> Self {
        self.neighbours
            .insert(word.to_string(), (vocabulary_word.to_string(), similarity));
        self
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SemanticMatcher for FakeMatcher {
    fn find_best_match(&self, word: &str) -> Result<MatchResult, MatcherError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(MatcherError::Embedding("model offline".into()));
        }

        let normalized = word.to_lowercase();
        if self.vocabulary.contains(&normalized) {
            return Ok(MatchResult::exact(word, normalized));
        }
        if let Some((best, similarity)) = self.neighbours.get(&normalized) {
            return Ok(MatchResult::scored(word, Some(best.clone()), *similarity, THRESHOLD));
        }
        // Unrelated word: weak similarity to the first entry
        Ok(MatchResult::scored(
            word,
            self.vocabulary.first().cloned(),
            0.12,
            THRESHOLD,
        ))
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn threshold(&self) -> f32 {
        THRESHOLD
    }
}

/// Returns the same entities for any text
#[derive(Default)]
pub struct FakeDetector {
    entities: Vec<EntityInfo>,
    policy: FingerspellPolicy,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl FakeDetector {
    /// `entities` are `(surface text, label)` pairs
    pub fn new(entities: &[(&str, &str)]) -> Self {
        Self {
            entities: entities
                .iter()
                .map(|(text, label)| EntityInfo {
                    text: text.to_string(),
                    label: label.to_string(),
                    start: 0,
                    end: text.chars().count(),
                })
                .collect(),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntityDetector for FakeDetector {
    fn detect_entities(&self, _text: &str) -> Result<Vec<EntityInfo>, EntityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(EntityError::Inference("out of memory".into()));
        }
        Ok(self.entities.clone())
    }

    fn policy(&self) -> &FingerspellPolicy {
        &self.policy
    }
}

/// Video store over a fixed word set
#[derive(Default)]
pub struct FakeStore {
    words: BTreeSet<String>,
    pub fail: bool,
    pub lookups: AtomicUsize,
}

impl FakeStore {
    pub fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn failing(words: &[&str]) -> Self {
        Self {
            fail: true,
            ..Self::new(words)
        }
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl VideoStore for FakeStore {
    fn video_exists(&self, word: &str) -> Result<bool, VideoStoreError> {
        Ok(self.words.contains(word))
    }

    fn find_video(&self, word: &str) -> Result<VideoLookupResult, VideoStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(VideoStoreError::Unavailable("disk detached".into()));
        }
        if self.words.contains(word) {
            Ok(VideoLookupResult::found(
                word,
                PathBuf::from(format!("/videos/{word}.mp4")),
                format!("/signs/{word}.mp4"),
            ))
        } else {
            Ok(VideoLookupResult::missing(word))
        }
    }

    fn get_available_words(&self) -> Result<Arc<BTreeSet<String>>, VideoStoreError> {
        Ok(Arc::new(self.words.clone()))
    }
}

/// Vocabulary {"hello", "welcome"}, both with videos, John and New York as
/// entities
pub fn scenario_parts() -> (Arc<FakeMatcher>, Arc<FakeDetector>, Arc<FakeStore>) {
    (
        Arc::new(FakeMatcher::new(&["hello", "welcome"])),
        Arc::new(FakeDetector::new(&[("John", "PERSON"), ("New York", "GPE")])),
        Arc::new(FakeStore::new(&["hello", "welcome"])),
    )
}

pub fn service(
    matcher: &Arc<FakeMatcher>,
    detector: &Arc<FakeDetector>,
    store: &Arc<FakeStore>,
) -> TranslationService {
    TranslationService::new(matcher.clone(), detector.clone(), store.clone())
}

pub fn scenario_service() -> TranslationService {
    let (matcher, detector, store) = scenario_parts();
    service(&matcher, &detector, &store)
}
