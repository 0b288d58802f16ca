//! Word embedding using Candle and a BERT sentence encoder
//!
//! Loads a sentence-transformers style BERT model from the HuggingFace Hub
//! and computes unit-length embeddings for words and short phrases.
//!
//! The default model is `sentence-transformers/all-MiniLM-L6-v2`, which uses
//! attention-masked mean pooling. BGE-style models (CLS pooling) are
//! supported through [`Pooling::Cls`].

use anyhow::{Context, Result};
use candle_core::{Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::types::{MatcherError, Pooling, DEFAULT_MODEL};

/// Anything that can turn text into unit-normalized embedding vectors.
///
/// The matcher relies on outputs being unit length so that a dot product is
/// the cosine similarity.
pub trait TextEmbedder: Send + Sync {
    /// Length of every vector returned by this embedder
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>, MatcherError>;

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MatcherError> {
        texts.iter().map(|t| self.embed(t)).collect()
    }
}

/// Sentence embedder backed by a Candle BERT model
pub struct Embedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    pooling: Pooling,
    model_name: String,
    dimension: usize,
}

impl Embedder {
    /// Create the default embedder, downloading the model if needed
    ///
    /// The model is cached in the HuggingFace cache directory (~/.cache/huggingface).
    pub fn new() -> Result<Self> {
        Self::with_model(DEFAULT_MODEL, Pooling::Mean)
    }

    /// Create an embedder for a specific model and pooling strategy
    pub fn with_model(model_name: &str, pooling: Pooling) -> Result<Self> {
        info!("Loading embedding model: {} ({:?} pooling)", model_name, pooling);

        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(model_name.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .context("Failed to download config.json")?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .context("Failed to download tokenizer.json")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("Failed to download model.safetensors")?;

        debug!("Model files downloaded to cache");

        let raw_config =
            std::fs::read_to_string(&config_path).context("Failed to read config.json")?;
        let config: Config =
            serde_json::from_str(&raw_config).context("Failed to parse config.json")?;
        let dimension = hidden_size(&raw_config)?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // SAFETY: the safetensors file lives in the read-only HF cache and is
        // not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                .context("Failed to load model weights")?
        };

        let model = BertModel::load(vb, &config).context("Failed to build BERT model")?;

        info!(dimension, "Embedding model loaded: {}", model_name);

        Ok(Self {
            model,
            tokenizer,
            device,
            pooling,
            model_name: model_name.to_string(),
            dimension,
        })
    }

    /// Batch forward pass, pooled and L2 normalized
    fn forward_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut all_input_ids = Vec::with_capacity(texts.len() * max_len);
        let mut all_attention_mask = Vec::with_capacity(texts.len() * max_len);
        let mut all_token_type_ids = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let mut ids = encoding.get_ids().to_vec();
            let mut attention = encoding.get_attention_mask().to_vec();
            let mut type_ids = encoding.get_type_ids().to_vec();

            ids.resize(max_len, 0);
            attention.resize(max_len, 0);
            type_ids.resize(max_len, 0);

            all_input_ids.extend(ids);
            all_attention_mask.extend(attention);
            all_token_type_ids.extend(type_ids);
        }

        let batch_size = texts.len();
        let input_ids = Tensor::from_vec(all_input_ids, (batch_size, max_len), &self.device)?;
        let attention_mask =
            Tensor::from_vec(all_attention_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids =
            Tensor::from_vec(all_token_type_ids, (batch_size, max_len), &self.device)?;

        // (batch_size, seq_len, hidden_size)
        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let pooled = self.pool(&output, &attention_mask)?;
        let normalized = Self::l2_normalize(&pooled)?;

        Ok(normalized.to_vec2::<f32>()?)
    }

    /// Reduce token embeddings to one vector per sequence
    fn pool(&self, output: &Tensor, attention_mask: &Tensor) -> Result<Tensor> {
        match self.pooling {
            Pooling::Cls => Ok(output.narrow(1, 0, 1)?.squeeze(1)?),
            Pooling::Mean => {
                // Padding positions must not contribute to the mean
                let mask = attention_mask.to_dtype(DTYPE)?.unsqueeze(2)?;
                let summed = output.broadcast_mul(&mask)?.sum(1)?;
                let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
                Ok(summed.broadcast_div(&counts)?)
            }
        }
    }

    /// L2 normalize embeddings for cosine similarity
    fn l2_normalize(tensor: &Tensor) -> Result<Tensor> {
        let norm = tensor
            .sqr()?
            .sum_keepdim(1)?
            .sqrt()?
            .clamp(1e-12, f64::MAX)?;
        Ok(tensor.broadcast_div(&norm)?)
    }

    pub fn pooling(&self) -> Pooling {
        self.pooling
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl TextEmbedder for Embedder {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>, MatcherError> {
        self.embed_batch(&[text])?
            .into_iter()
            .next()
            .ok_or_else(|| MatcherError::Embedding("model returned no embedding".into()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, MatcherError> {
        self.forward_batch(texts)
            .map_err(|e| MatcherError::Embedding(e.to_string()))
    }
}

/// `hidden_size` from a BERT `config.json`
fn hidden_size(raw_config: &str) -> Result<usize> {
    #[derive(serde::Deserialize)]
    struct Dims {
        hidden_size: usize,
    }
    let dims: Dims = serde_json::from_str(raw_config).context("config.json has no hidden_size")?;
    Ok(dims.hidden_size)
}
