//! Translation output types

use serde::Serialize;
use std::fmt;

/// How a word is rendered in sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationKind {
    /// Played as a sign video
    Video,
    /// Spelled letter by letter
    Fingerspell,
    /// No sign rendering
    Skipped,
}

impl fmt::Display for TranslationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslationKind::Video => write!(f, "video"),
            TranslationKind::Fingerspell => write!(f, "fingerspell"),
            TranslationKind::Skipped => write!(f, "skipped"),
        }
    }
}

/// Rendering decision for one input word
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationItem {
    /// Token as it appeared in the input
    pub original_word: String,
    /// Vocabulary word whose video is played (video items only)
    pub matched_word: Option<String>,
    #[serde(rename = "type")]
    pub kind: TranslationKind,
    /// Video URL (video items only)
    pub url: Option<String>,
    /// Letters to spell (fingerspell items only)
    pub letters: Option<Vec<char>>,
    /// Best similarity the matcher reported for this word
    pub similarity: Option<f32>,
}

impl TranslationItem {
    pub fn video(original_word: &str, matched_word: String, url: String, similarity: f32) -> Self {
        Self {
            original_word: original_word.to_string(),
            matched_word: Some(matched_word),
            kind: TranslationKind::Video,
            url: Some(url),
            letters: None,
            similarity: Some(similarity),
        }
    }

    /// Letters are the alphabetic characters of `original_word`, lowercased
    pub fn fingerspell(original_word: &str, similarity: f32) -> Self {
        let letters = original_word
            .chars()
            .filter(|c| c.is_alphabetic())
            .flat_map(char::to_lowercase)
            .collect();
        Self {
            original_word: original_word.to_string(),
            matched_word: None,
            kind: TranslationKind::Fingerspell,
            url: None,
            letters: Some(letters),
            similarity: Some(similarity),
        }
    }

    pub fn skipped(original_word: &str, similarity: f32) -> Self {
        Self {
            original_word: original_word.to_string(),
            matched_word: None,
            kind: TranslationKind::Skipped,
            url: None,
            letters: None,
            similarity: Some(similarity),
        }
    }
}

/// Ordered translation of a full text, one item per token
///
/// Counts are only updated through [`TranslationResult::push`], so they
/// always agree with the items.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationResult {
    original_text: String,
    items: Vec<TranslationItem>,
    video_count: usize,
    fingerspell_count: usize,
    skipped_count: usize,
}

impl TranslationResult {
    pub fn new(original_text: impl Into<String>) -> Self {
        Self {
            original_text: original_text.into(),
            items: Vec::new(),
            video_count: 0,
            fingerspell_count: 0,
            skipped_count: 0,
        }
    }

    pub fn push(&mut self, item: TranslationItem) {
        match item.kind {
            TranslationKind::Video => self.video_count += 1,
            TranslationKind::Fingerspell => self.fingerspell_count += 1,
            TranslationKind::Skipped => self.skipped_count += 1,
        }
        self.items.push(item);
    }

    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    pub fn items(&self) -> &[TranslationItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<TranslationItem> {
        self.items
    }

    pub fn video_count(&self) -> usize {
        self.video_count
    }

    pub fn fingerspell_count(&self) -> usize {
        self.fingerspell_count
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn kinds(&self) -> Vec<TranslationKind> {
        self.items.iter().map(|item| item.kind).collect()
    }
}
