//! Semantic Sign Vocabulary Matcher
//!
//! Maps an input word onto the closest word of a fixed sign vocabulary using
//! sentence embeddings computed with Candle.
//!
//! # Architecture
//!
//! ```text
//! Input word ("Hi")
//!       │
//!       ▼  lowercase
//! ┌─────────────────────────────────────────┐
//! │  Exact vocabulary lookup                │──── hit ───► similarity 1.0
//! └─────────────────────────────────────────┘
//!       │ miss
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  Embedder (all-MiniLM-L6-v2)           │
//! │  "hi" → [384 dims], unit length        │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  Dot product vs precomputed vocabulary  │
//! │  matrix → argmax                        │
//! └─────────────────────────────────────────┘
//!       │
//!       ├─── similarity >= threshold ───► match ("hello")
//!       │
//!       ▼
//!   no match (similarity still reported)
//! ```
//!
//! Vocabulary embeddings are computed exactly once, when an
//! [`EmbeddingMatcher`] is built. Reloading the vocabulary means building a
//! new matcher.

pub mod embedder;
pub mod matcher;
pub mod types;
pub mod vector;

pub use embedder::{Embedder, TextEmbedder};
pub use matcher::{EmbeddingMatcher, SemanticMatcher};
pub use types::*;
