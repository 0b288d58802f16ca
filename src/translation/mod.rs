//! Text to sign translation pipeline
//!
//! Every token of the input becomes exactly one [`TranslationItem`]:
//!
//! 1. semantic match against the sign vocabulary, then video lookup
//! 2. fingerspelling when the word belongs to a named entity
//! 3. skipped otherwise

mod result;
mod service;

pub use result::{TranslationItem, TranslationKind, TranslationResult};
pub use service::TranslationService;
