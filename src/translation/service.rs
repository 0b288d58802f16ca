//! Translation orchestrator

use std::sync::Arc;

use sign_semantic_matcher::SemanticMatcher;
use tracing::{debug, instrument, warn};

use super::{TranslationItem, TranslationResult};
use crate::entity::EntityDetector;
use crate::error::TranslationError;
use crate::text::tokenize;
use crate::video::VideoStore;

/// Composes matcher, entity detector and video store into word-by-word
/// translation.
///
/// Holds no per-call state; one instance serves concurrent requests.
#[derive(Clone)]
pub struct TranslationService {
    matcher: Arc<dyn SemanticMatcher>,
    detector: Arc<dyn EntityDetector>,
    store: Arc<dyn VideoStore>,
}

impl TranslationService {
    pub fn new(
        matcher: Arc<dyn SemanticMatcher>,
        detector: Arc<dyn EntityDetector>,
        store: Arc<dyn VideoStore>,
    ) -> Self {
        Self {
            matcher,
            detector,
            store,
        }
    }

    /// Translate `text` into one item per word token.
    ///
    /// Entity detection runs once over the whole text before any word is
    /// classified. Any collaborator error aborts the call.
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub fn translate(&self, text: &str) -> Result<TranslationResult, TranslationError> {
        let tokens = tokenize(text);
        let entity_words = self.detector.get_entity_words(text)?;
        debug!(
            tokens = tokens.len(),
            entity_words = entity_words.len(),
            "Translating"
        );

        let mut result = TranslationResult::new(text);

        for token in &tokens {
            let normalized = token.normalized();
            let matched = self.matcher.find_best_match(&normalized)?;

            if let (true, Some(matched_word)) = (matched.is_match, matched.matched_word) {
                let video = self.store.find_video(&matched_word)?;
                match video.url {
                    Some(url) if video.found => {
                        debug!(word = %token.text, %matched_word, method = %matched.method, "video");
                        result.push(TranslationItem::video(
                            &token.text,
                            matched_word,
                            url,
                            matched.similarity,
                        ));
                        continue;
                    }
                    _ => warn!(
                        word = %token.text,
                        %matched_word,
                        "Vocabulary word has no video, falling back"
                    ),
                }
            }

            if entity_words.contains(&normalized) {
                debug!(word = %token.text, "fingerspell");
                result.push(TranslationItem::fingerspell(&token.text, matched.similarity));
            } else {
                debug!(word = %token.text, similarity = matched.similarity, "skipped");
                result.push(TranslationItem::skipped(&token.text, matched.similarity));
            }
        }

        Ok(result)
    }

    /// Size of the sign vocabulary the matcher was built from
    pub fn available_word_count(&self) -> usize {
        self.matcher.vocabulary_size()
    }

    pub fn similarity_threshold(&self) -> f32 {
        self.matcher.threshold()
    }
}
