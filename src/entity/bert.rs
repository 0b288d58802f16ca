//! BERT token-classification NER using Candle
//!
//! Loads a HuggingFace `BertForTokenClassification` checkpoint (default
//! `dslim/bert-base-NER`, CoNLL-03 labels PER/ORG/LOC/MISC), predicts a BIO
//! tag per sub-token and merges tags into entity spans using the
//! tokenizer's character offsets.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::models::wordpiece::WordPiece;
use tokenizers::normalizers::BertNormalizer;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::processors::bert::BertProcessing;
use tokenizers::{Encoding, Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use super::{char_slice, normalize_label, EntityDetector, EntityError, EntityInfo, FingerspellPolicy};

/// Default HuggingFace NER checkpoint
pub const DEFAULT_NER_MODEL: &str = "dslim/bert-base-NER";

/// BERT position embedding limit
const MAX_SEQUENCE_LEN: usize = 512;

/// Named entity detector backed by a BERT token classifier
pub struct BertNerDetector {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    /// Tag for each classifier output index ("O", "B-PER", ...)
    id2label: Vec<String>,
    device: Device,
    policy: FingerspellPolicy,
}

/// Fields of `config.json` that candle's BERT config does not expose
#[derive(serde::Deserialize)]
struct ClassifierConfig {
    hidden_size: usize,
    id2label: HashMap<String, String>,
}

impl BertNerDetector {
    /// Download (or reuse from the HF cache) and load `model_name`
    pub fn from_hub(model_name: &str, policy: FingerspellPolicy) -> Result<Self> {
        info!("Loading NER model: {}", model_name);

        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(model_name.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .context("Failed to download config.json")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("Failed to download model.safetensors")?;

        let raw_config =
            std::fs::read_to_string(&config_path).context("Failed to read config.json")?;
        let config: Config =
            serde_json::from_str(&raw_config).context("Failed to parse config.json")?;
        let classifier_config: ClassifierConfig =
            serde_json::from_str(&raw_config).context("config.json has no id2label")?;
        let id2label = label_table(&classifier_config.id2label)?;

        // Older checkpoints (including the default) ship only vocab.txt
        let mut tokenizer = match repo.get("tokenizer.json") {
            Ok(tokenizer_path) => Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?,
            Err(e) => {
                debug!("No tokenizer.json for {} ({}), using vocab.txt", model_name, e);
                let vocab_path = repo
                    .get("vocab.txt")
                    .context("Failed to download tokenizer.json or vocab.txt")?;
                let lowercase = match repo.get("tokenizer_config.json") {
                    Ok(path) => {
                        let raw = std::fs::read_to_string(&path)
                            .context("Failed to read tokenizer_config.json")?;
                        do_lower_case(&raw)?
                    }
                    Err(_) => DEFAULT_DO_LOWER_CASE,
                };
                wordpiece_tokenizer(&vocab_path, lowercase)?
            }
        };
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LEN,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Failed to configure truncation: {}", e))?;

        // SAFETY: the safetensors file lives in the read-only HF cache and is
        // not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                .context("Failed to load model weights")?
        };

        // Checkpoint weights live under "bert.*"; BertModel::load falls back
        // to the model_type prefix
        let model = BertModel::load(vb.clone(), &config).context("Failed to build BERT model")?;
        let classifier = candle_nn::linear(
            classifier_config.hidden_size,
            id2label.len(),
            vb.pp("classifier"),
        )
        .context("Failed to load classifier head")?;

        info!(labels = id2label.len(), "NER model loaded: {}", model_name);

        Ok(Self {
            model,
            classifier,
            tokenizer,
            id2label,
            device,
            policy,
        })
    }

    fn predict(&self, text: &str) -> Result<Vec<EntityInfo>> {
        let encoding = self
            .tokenizer
            .encode_char_offsets(text, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let overflow = truncated_tokens(&encoding);
        if overflow > 0 {
            warn!(
                dropped_tokens = overflow,
                "Text exceeds {} sub-tokens; entities past the limit are not detected",
                MAX_SEQUENCE_LEN
            );
        }

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        // (1, seq_len, hidden) -> (1, seq_len, num_labels)
        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let logits = self.classifier.forward(&hidden)?;
        let predictions = logits.squeeze(0)?.argmax(1)?.to_vec1::<u32>()?;

        let tagged: Vec<TaggedPiece<'_>> = predictions
            .iter()
            .enumerate()
            .filter(|(i, _)| encoding.get_special_tokens_mask()[*i] == 0)
            .map(|(i, &pred)| TaggedPiece {
                tag: self
                    .id2label
                    .get(pred as usize)
                    .map(String::as_str)
                    .unwrap_or("O"),
                continuation: encoding.get_tokens()[i].starts_with("##"),
                start: encoding.get_offsets()[i].0,
                end: encoding.get_offsets()[i].1,
            })
            .collect();

        let entities = merge_bio(text, &tagged);
        debug!(count = entities.len(), "NER entities detected");
        Ok(entities)
    }
}

impl EntityDetector for BertNerDetector {
    fn detect_entities(&self, text: &str) -> Result<Vec<EntityInfo>, EntityError> {
        if text.trim().is_empty() {
            return Ok(vec![]);
        }
        self.predict(text)
            .map_err(|e| EntityError::Inference(e.to_string()))
    }

    fn policy(&self) -> &FingerspellPolicy {
        &self.policy
    }
}

/// Sub-tokens cut off by truncation
fn truncated_tokens(encoding: &Encoding) -> usize {
    encoding.get_overflowing().iter().map(Encoding::len).sum()
}

/// `BertTokenizer` lowercases unless the checkpoint says otherwise
const DEFAULT_DO_LOWER_CASE: bool = true;

#[derive(serde::Deserialize)]
struct TokenizerConfig {
    do_lower_case: Option<bool>,
}

fn do_lower_case(raw_config: &str) -> Result<bool> {
    let config: TokenizerConfig =
        serde_json::from_str(raw_config).context("Failed to parse tokenizer_config.json")?;
    Ok(config.do_lower_case.unwrap_or(DEFAULT_DO_LOWER_CASE))
}

/// Rebuild the standard BERT WordPiece pipeline from a `vocab.txt`
fn wordpiece_tokenizer(vocab_path: &Path, lowercase: bool) -> Result<Tokenizer> {
    let vocab = vocab_path
        .to_str()
        .context("vocab.txt path is not valid UTF-8")?;
    let model = WordPiece::from_file(vocab)
        .unk_token("[UNK]".to_string())
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to load vocab.txt: {}", e))?;

    let mut tokenizer = Tokenizer::new(model);
    let special_id = |token: &str| {
        tokenizer
            .token_to_id(token)
            .with_context(|| format!("vocab.txt has no {token} token"))
    };
    let sep = special_id("[SEP]")?;
    let cls = special_id("[CLS]")?;

    tokenizer
        .with_normalizer(Some(BertNormalizer::new(true, true, None, lowercase)))
        .with_pre_tokenizer(Some(BertPreTokenizer))
        .with_post_processor(Some(BertProcessing::new(
            ("[SEP]".to_string(), sep),
            ("[CLS]".to_string(), cls),
        )));
    Ok(tokenizer)
}

/// `{"0": "O", "1": "B-MISC", ...}` as a dense index-ordered table
fn label_table(id2label: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut table = vec![String::from("O"); id2label.len()];
    for (id, label) in id2label {
        let idx: usize = id
            .parse()
            .with_context(|| format!("non-numeric label id '{id}'"))?;
        let slot = table
            .get_mut(idx)
            .with_context(|| format!("label id {idx} out of range"))?;
        *slot = label.clone();
    }
    Ok(table)
}

/// One non-special sub-token with its predicted tag
#[derive(Debug, Clone, Copy)]
struct TaggedPiece<'a> {
    tag: &'a str,
    /// WordPiece continuation ("##ton")
    continuation: bool,
    start: usize,
    end: usize,
}

/// Merge BIO-tagged pieces into entities.
///
/// `B-X` opens an entity, `I-X` extends an open `X` entity (or opens one),
/// and a WordPiece continuation always extends the open entity so a word is
/// never split across entities.
fn merge_bio(text: &str, pieces: &[TaggedPiece<'_>]) -> Vec<EntityInfo> {
    let mut entities = Vec::new();
    // (kind, start, end) in characters
    let mut open: Option<(&str, usize, usize)> = None;

    let mut close = |open: &mut Option<(&str, usize, usize)>| {
        if let Some((kind, start, end)) = open.take() {
            entities.push(EntityInfo {
                text: char_slice(text, start, end),
                label: normalize_label(kind),
                start,
                end,
            });
        }
    };

    for piece in pieces {
        if piece.continuation {
            if let Some((_, _, end)) = open.as_mut() {
                *end = piece.end;
                continue;
            }
        }

        match piece.tag.split_once('-') {
            Some(("I", kind)) if open.is_some_and(|(open_kind, _, _)| open_kind == kind) => {
                if let Some((_, _, end)) = open.as_mut() {
                    *end = piece.end;
                }
            }
            Some((_, kind)) => {
                close(&mut open);
                open = Some((kind, piece.start, piece.end));
            }
            None => close(&mut open),
        }
    }
    close(&mut open);

    entities
}
