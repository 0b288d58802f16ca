//! Semantic Matcher - exact vocabulary lookup with embedding fallback
//!
//! The main entry point for mapping a word onto the sign vocabulary.

use std::collections::HashMap;

use tracing::{debug, info, instrument};

use crate::{
    embedder::TextEmbedder,
    types::{MatchResult, MatcherError},
    vector::dot,
};

/// Number of vocabulary words embedded per model call during construction
const BUILD_BATCH_SIZE: usize = 64;

/// Contract for mapping a word onto the closest vocabulary entry
pub trait SemanticMatcher: Send + Sync {
    /// Find the best matching vocabulary word for `word`.
    ///
    /// The word is lowercased first. A word that is itself in the vocabulary
    /// always resolves to itself with similarity 1.0.
    fn find_best_match(&self, word: &str) -> Result<MatchResult, MatcherError>;

    /// Number of distinct vocabulary entries
    fn vocabulary_size(&self) -> usize;

    /// Minimum similarity (inclusive) for a semantic match
    fn threshold(&self) -> f32;
}

/// Embedding-based matcher over a fixed vocabulary
///
/// All vocabulary embeddings are computed in [`EmbeddingMatcher::build`] and
/// stored as a row-major matrix. Queries never embed vocabulary words.
pub struct EmbeddingMatcher<E> {
    embedder: E,
    vocabulary: Vec<String>,
    word_to_idx: HashMap<String, usize>,
    /// `vocabulary.len() * dimension` unit-normalized values
    matrix: Vec<f32>,
    dimension: usize,
    threshold: f32,
}

impl<E: TextEmbedder> EmbeddingMatcher<E> {
    /// Lowercase and de-duplicate `vocabulary` (first occurrence wins the
    /// position), then precompute one embedding per entry.
    pub fn build<I, S>(embedder: E, vocabulary: I, threshold: f32) -> Result<Self, MatcherError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !threshold.is_finite() || !(-1.0..=1.0).contains(&threshold) {
            return Err(MatcherError::InvalidThreshold(threshold));
        }

        let mut words: Vec<String> = Vec::new();
        let mut word_to_idx = HashMap::new();
        for word in vocabulary {
            let word = word.as_ref().trim().to_lowercase();
            if word.is_empty() || word_to_idx.contains_key(&word) {
                continue;
            }
            word_to_idx.insert(word.clone(), words.len());
            words.push(word);
        }

        let dimension = embedder.dimension();
        if dimension == 0 {
            return Err(MatcherError::Embedding(
                "embedder reports zero dimension".into(),
            ));
        }
        info!(
            "Computing embeddings for {} vocabulary words (dim {})",
            words.len(),
            dimension
        );

        let mut matrix = Vec::with_capacity(words.len() * dimension);
        for chunk in words.chunks(BUILD_BATCH_SIZE) {
            let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
            let embeddings = embedder.embed_batch(&refs)?;
            if embeddings.len() != refs.len() {
                return Err(MatcherError::Embedding(format!(
                    "expected {} embeddings, model returned {}",
                    refs.len(),
                    embeddings.len()
                )));
            }
            for embedding in embeddings {
                check_dimension(dimension, &embedding)?;
                matrix.extend(embedding);
            }
        }

        info!("Vocabulary embeddings ready");

        Ok(Self {
            embedder,
            vocabulary: words,
            word_to_idx,
            matrix,
            dimension,
            threshold,
        })
    }

    /// Vocabulary in index order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    /// Highest-similarity row; ties keep the earliest row
    fn nearest(&self, query: &[f32]) -> Option<(usize, f32)> {
        let mut best: Option<(usize, f32)> = None;
        for (idx, row) in self.matrix.chunks_exact(self.dimension).enumerate() {
            let similarity = dot(row, query);
            match best {
                Some((_, best_sim)) if similarity <= best_sim => {}
                _ => best = Some((idx, similarity)),
            }
        }
        best
    }
}

impl<E: TextEmbedder> SemanticMatcher for EmbeddingMatcher<E> {
    #[instrument(skip(self), fields(word = %word))]
    fn find_best_match(&self, word: &str) -> Result<MatchResult, MatcherError> {
        let normalized = word.to_lowercase();

        if let Some(&idx) = self.word_to_idx.get(&normalized) {
            debug!("Exact vocabulary match");
            return Ok(MatchResult::exact(word, self.vocabulary[idx].clone()));
        }

        if self.vocabulary.is_empty() {
            return Ok(MatchResult::scored(word, None, 0.0, self.threshold));
        }

        let query = self.embedder.embed(&normalized)?;
        check_dimension(self.dimension, &query)?;

        let Some((idx, similarity)) = self.nearest(&query) else {
            return Ok(MatchResult::scored(word, None, 0.0, self.threshold));
        };
        let similarity = similarity.clamp(-1.0, 1.0);

        debug!(
            "Nearest vocabulary word: {} ({:.3})",
            self.vocabulary[idx], similarity
        );

        Ok(MatchResult::scored(
            word,
            Some(self.vocabulary[idx].clone()),
            similarity,
            self.threshold,
        ))
    }

    fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    fn threshold(&self) -> f32 {
        self.threshold
    }
}

fn check_dimension(expected: usize, embedding: &[f32]) -> Result<(), MatcherError> {
    if embedding.len() != expected {
        return Err(MatcherError::DimensionMismatch {
            expected,
            actual: embedding.len(),
        });
    }
    Ok(())
}
