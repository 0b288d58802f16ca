//! Named entity detection for fingerspelling
//!
//! A word is fingerspelled when it is part of a named entity whose label is
//! in the detector's [`FingerspellPolicy`]. Detection runs once over the full
//! text so that the detector can use sentence-level context; the pipeline
//! only consumes the resulting set of lowercased entity words.
//!
//! Two detectors are provided:
//!
//! - [`HeuristicEntityDetector`] - capitalisation rules, no model
//! - [`BertNerDetector`] - Candle BERT token classification

mod bert;
mod heuristic;

pub use bert::{BertNerDetector, DEFAULT_NER_MODEL};
pub use heuristic::{HeuristicEntityDetector, PROPER_NOUN_LABEL};

use std::collections::{BTreeSet, HashSet};

use serde::Serialize;

/// A detected named entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityInfo {
    /// Surface text of the entity
    pub text: String,
    /// Category label (PERSON, ORG, GPE, ...)
    pub label: String,
    /// Character offset of the first character
    pub start: usize,
    /// Character offset one past the last character
    pub end: usize,
}

impl EntityInfo {
    /// Lowercased whitespace-separated pieces of the surface text
    pub fn words(&self) -> impl Iterator<Item = String> + '_ {
        self.text.split_whitespace().map(str::to_lowercase)
    }
}

/// Labels whose entities are fingerspelled
pub const DEFAULT_FINGERSPELL_LABELS: &[&str] =
    &["PERSON", "ORG", "GPE", "LOC", "FAC", "PRODUCT", "EVENT"];

/// Set of entity labels eligible for fingerspelling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerspellPolicy {
    labels: BTreeSet<String>,
}

impl Default for FingerspellPolicy {
    fn default() -> Self {
        Self::from_labels(DEFAULT_FINGERSPELL_LABELS.iter().copied())
    }
}

impl FingerspellPolicy {
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels.into_iter().map(|l| normalize_label(l.as_ref())).collect(),
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.labels.insert(normalize_label(label));
        self
    }

    pub fn is_eligible(&self, label: &str) -> bool {
        self.labels.contains(label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

/// Map model-specific label spellings onto one taxonomy
pub fn normalize_label(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.as_str() {
        "PER" => "PERSON".to_string(),
        "ORGANIZATION" => "ORG".to_string(),
        "LOCATION" => "LOC".to_string(),
        _ => upper,
    }
}

/// Errors raised by entity detectors
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    #[error("NER inference failed: {0}")]
    Inference(String),
}

/// Contract for finding fingerspell-worthy named entities in text
pub trait EntityDetector: Send + Sync {
    /// All entities in `text`, in order of appearance, regardless of label
    fn detect_entities(&self, text: &str) -> Result<Vec<EntityInfo>, EntityError>;

    /// Labels this detector fingerspells
    fn policy(&self) -> &FingerspellPolicy;

    /// Lowercased words belonging to eligible entities in `text`
    fn get_entity_words(&self, text: &str) -> Result<HashSet<String>, EntityError> {
        let entities = self.detect_entities(text)?;
        Ok(entity_words(&entities, self.policy()))
    }

    /// Whether `word` is part of an eligible entity in `context`.
    ///
    /// The first entity containing the word as a whole word decides.
    fn is_named_entity(&self, word: &str, context: &str) -> Result<bool, EntityError> {
        let word = word.to_lowercase();
        let entities = self.detect_entities(context)?;
        Ok(entities
            .iter()
            .find(|entity| entity.words().any(|w| w == word))
            .is_some_and(|entity| self.policy().is_eligible(&entity.label)))
    }
}

/// Union of the lowercased words of every eligible entity
pub fn entity_words(entities: &[EntityInfo], policy: &FingerspellPolicy) -> HashSet<String> {
    entities
        .iter()
        .filter(|entity| policy.is_eligible(&entity.label))
        .flat_map(|entity| entity.words())
        .collect()
}

/// Substring of `text` between two character offsets
pub(crate) fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end.saturating_sub(start)).collect()
}
