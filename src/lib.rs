//! signbridge - text to sign-language translation
//!
//! Each word of the input is rendered as a sign video when it matches the
//! sign vocabulary (exactly or by embedding similarity), fingerspelled when
//! it belongs to a named entity, and skipped otherwise.
//!
//! ```text
//! text ──► tokenize ──► per word:
//!                        ├─ SemanticMatcher ──► VideoStore ──► video
//!                        ├─ entity words (EntityDetector, once per text) ──► fingerspell
//!                        └─ skipped
//! ```
//!
//! Collaborators are traits so the pipeline can run against fakes; the
//! concrete implementations are built in [`bootstrap`].

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod entity;
pub mod error;
pub mod text;
pub mod translation;
pub mod video;

pub use config::{NerBackend, Settings};
pub use entity::{
    BertNerDetector, EntityDetector, EntityInfo, FingerspellPolicy, HeuristicEntityDetector,
};
pub use error::{ConfigError, TranslationError};
pub use sign_semantic_matcher::{MatchResult, SemanticMatcher};
pub use text::{tokenize, Token};
pub use translation::{TranslationItem, TranslationKind, TranslationResult, TranslationService};
pub use video::{FileSystemVideoStore, VideoLookupResult, VideoStore};
