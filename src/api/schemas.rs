//! Request and response bodies

use serde::{Deserialize, Serialize};

use crate::translation::{TranslationItem, TranslationResult};

/// Inclusive bounds on the request text, in characters
pub const MIN_TEXT_CHARS: usize = 1;
pub const MAX_TEXT_CHARS: usize = 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
}

impl TranslateRequest {
    /// Error message when the text length is out of bounds
    pub fn validation_error(&self) -> Option<String> {
        let chars = self.text.chars().count();
        if chars < MIN_TEXT_CHARS {
            Some(format!(
                "text: must contain at least {MIN_TEXT_CHARS} character"
            ))
        } else if chars > MAX_TEXT_CHARS {
            Some(format!(
                "text: must contain at most {MAX_TEXT_CHARS} characters (got {chars})"
            ))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TranslationItemBody {
    pub original_word: String,
    pub matched_word: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub url: Option<String>,
    pub letters: Option<Vec<String>>,
    pub similarity: Option<f32>,
}

impl From<TranslationItem> for TranslationItemBody {
    fn from(item: TranslationItem) -> Self {
        Self {
            original_word: item.original_word,
            matched_word: item.matched_word,
            kind: item.kind.to_string(),
            url: item.url,
            letters: item
                .letters
                .map(|letters| letters.into_iter().map(String::from).collect()),
            similarity: item.similarity,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslationStats {
    pub video_count: usize,
    pub fingerspell_count: usize,
    pub skipped_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub success: bool,
    pub original_text: String,
    pub translations: Vec<TranslationItemBody>,
    pub stats: TranslationStats,
}

impl From<TranslationResult> for TranslateResponse {
    fn from(result: TranslationResult) -> Self {
        let stats = TranslationStats {
            video_count: result.video_count(),
            fingerspell_count: result.fingerspell_count(),
            skipped_count: result.skipped_count(),
            total: result.total(),
        };
        let original_text = result.original_text().to_string();
        Self {
            success: true,
            original_text,
            translations: result
                .into_items()
                .into_iter()
                .map(TranslationItemBody::from)
                .collect(),
            stats,
        }
    }
}

impl TranslateResponse {
    pub fn kinds(&self) -> Vec<&str> {
        self.translations.iter().map(|t| t.kind.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub available_words: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub health: String,
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub detail: String,
}
