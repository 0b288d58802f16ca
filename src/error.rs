//! Error types for the translation service
//!
//! Collaborator errors pass through [`TranslationError`] unchanged so callers
//! can still tell which component failed. A vocabulary miss is not an error:
//! it is a classification outcome.

use thiserror::Error;

pub use crate::entity::EntityError;
pub use crate::video::VideoStoreError;
pub use sign_semantic_matcher::MatcherError;

/// Failure of a whole translation call
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Semantic matching failed: {0}")]
    Matcher(#[from] MatcherError),

    #[error("Entity detection failed: {0}")]
    Entity(#[from] EntityError),

    #[error("Video lookup failed: {0}")]
    VideoStore(#[from] VideoStoreError),
}

/// Invalid or unreadable settings
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {var}: '{value}' ({reason})")]
    InvalidValue {
        var: String,
        value: String,
        reason: String,
    },

    #[error("Malformed CORS origin list: {0}")]
    CorsOrigins(String),
}

impl ConfigError {
    pub(crate) fn invalid(var: &str, value: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            var: var.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
