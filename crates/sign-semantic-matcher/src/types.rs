//! Shared types for semantic vocabulary matching

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default sentence-transformers model used for word embeddings
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Default minimum similarity for accepting a semantic match
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.7;

/// How a match result was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Word is itself a vocabulary entry
    Exact,
    /// Nearest vocabulary entry by cosine similarity
    Semantic,
}

impl fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchMethod::Exact => write!(f, "exact"),
            MatchMethod::Semantic => write!(f, "semantic"),
        }
    }
}

/// Result of matching one word against the sign vocabulary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The word as it was passed in
    pub query_word: String,
    /// Matched vocabulary word, only set when `is_match` holds
    pub matched_word: Option<String>,
    /// Cosine similarity of the best candidate, reported even without a match
    pub similarity: f32,
    /// `similarity >= threshold` and a vocabulary word was found
    pub is_match: bool,
    pub method: MatchMethod,
}

impl MatchResult {
    /// Exact vocabulary hit
    pub fn exact(query_word: impl Into<String>, vocabulary_word: impl Into<String>) -> Self {
        Self {
            query_word: query_word.into(),
            matched_word: Some(vocabulary_word.into()),
            similarity: 1.0,
            is_match: true,
            method: MatchMethod::Exact,
        }
    }

    /// Nearest-neighbour result, accepted iff `similarity >= threshold`
    pub fn scored(
        query_word: impl Into<String>,
        best_word: Option<String>,
        similarity: f32,
        threshold: f32,
    ) -> Self {
        let is_match = best_word.is_some() && similarity >= threshold;
        Self {
            query_word: query_word.into(),
            matched_word: if is_match { best_word } else { None },
            similarity,
            is_match,
            method: MatchMethod::Semantic,
        }
    }
}

/// Pooling strategy applied to the encoder's token embeddings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    /// Attention-masked mean over tokens (sentence-transformers models)
    #[default]
    Mean,
    /// CLS token at position 0 (BGE models)
    Cls,
}

impl FromStr for Pooling {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Pooling::Mean),
            "cls" => Ok(Pooling::Cls),
            other => Err(format!("unknown pooling strategy '{other}' (expected mean|cls)")),
        }
    }
}

/// Configuration for building a matcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// HuggingFace model repository
    pub model_name: String,
    pub pooling: Pooling,
    /// Minimum similarity for a semantic match (inclusive)
    pub similarity_threshold: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL.to_string(),
            pooling: Pooling::Mean,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Errors raised while building or querying a matcher
#[derive(Debug, thiserror::Error)]
pub enum MatcherError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid similarity threshold {0}: must be finite and within [-1, 1]")]
    InvalidThreshold(f32),
}
