//! Capitalisation-based proper noun detection
//!
//! Treats runs of capitalised words as proper nouns. The first word of a
//! sentence is capitalised for grammatical reasons, so a run that starts a
//! sentence loses its first word. Words in a run must be separated by
//! whitespace only; any punctuation ends the run.

use super::{EntityDetector, EntityError, EntityInfo, FingerspellPolicy};
use crate::text::{tokenize, Token};

/// Label attached to every entity this detector emits
pub const PROPER_NOUN_LABEL: &str = "PROPN";

/// Capitalised words that are never names on their own
const ALWAYS_CAPITALISED: &[&str] = &["I"];

/// Model-free entity detector
#[derive(Debug, Clone)]
pub struct HeuristicEntityDetector {
    policy: FingerspellPolicy,
}

impl Default for HeuristicEntityDetector {
    fn default() -> Self {
        Self::new(FingerspellPolicy::default())
    }
}

impl HeuristicEntityDetector {
    /// `PROPN` is always added to `policy`
    pub fn new(policy: FingerspellPolicy) -> Self {
        Self {
            policy: policy.with_label(PROPER_NOUN_LABEL),
        }
    }
}

impl EntityDetector for HeuristicEntityDetector {
    fn detect_entities(&self, text: &str) -> Result<Vec<EntityInfo>, EntityError> {
        let tokens = tokenize(text);
        let mut entities = Vec::new();
        let mut run: Vec<&Token> = Vec::new();
        let mut run_starts_sentence = false;
        let mut prev_end = 0;

        for token in &tokens {
            let gap = &text[prev_end..token.start];
            let sentence_start = token.index == 0 || gap.contains(['.', '!', '?']);
            let joins_run = !run.is_empty() && gap.chars().all(char::is_whitespace);

            if !joins_run {
                flush(text, &mut run, run_starts_sentence, &mut entities);
            }

            if is_capitalised(&token.text) {
                if run.is_empty() {
                    run_starts_sentence = sentence_start;
                }
                run.push(token);
            } else {
                flush(text, &mut run, run_starts_sentence, &mut entities);
            }
            prev_end = token.end;
        }
        flush(text, &mut run, run_starts_sentence, &mut entities);

        Ok(entities)
    }

    fn policy(&self) -> &FingerspellPolicy {
        &self.policy
    }
}

fn is_capitalised(word: &str) -> bool {
    !ALWAYS_CAPITALISED.contains(&word)
        && word.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

/// Emit the pending run as an entity and clear it
fn flush(text: &str, run: &mut Vec<&Token>, starts_sentence: bool, out: &mut Vec<EntityInfo>) {
    let skip = usize::from(starts_sentence);
    if run.len() > skip {
        let first = run[skip];
        let last = run[run.len() - 1];
        out.push(EntityInfo {
            text: text[first.start..last.end].to_string(),
            label: PROPER_NOUN_LABEL.to_string(),
            start: text[..first.start].chars().count(),
            end: text[..last.end].chars().count(),
        });
    }
    run.clear();
}
