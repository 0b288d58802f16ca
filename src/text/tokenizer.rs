//! Word tokenizer
//!
//! A token is a maximal run of ASCII letters. Everything else (digits,
//! punctuation, whitespace, non-ASCII letters) separates tokens and is
//! dropped, so "John's" yields "John" and "s".

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[a-zA-Z]+").expect("word pattern is a valid regex"));

/// A word extracted from the source text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// Surface form, original casing
    pub text: String,
    /// Position in the token sequence
    pub index: usize,
    /// Byte offset of the first character in the source text
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token {
    pub fn normalized(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Split `text` into word tokens, in order
pub fn tokenize(text: &str) -> Vec<Token> {
    WORD_PATTERN
        .find_iter(text)
        .enumerate()
        .map(|(index, m)| Token {
            text: m.as_str().to_string(),
            index,
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

/// Surface forms only
pub fn words(text: &str) -> Vec<&str> {
    WORD_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
}
