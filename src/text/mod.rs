//! Text handling shared by the translation pipeline

mod tokenizer;

pub use tokenizer::{tokenize, words, Token};
