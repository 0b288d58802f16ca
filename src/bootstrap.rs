//! Service construction
//!
//! Order matters: the video store provides the vocabulary, the matcher
//! embeds it, and only then is the translation service wired together.

use std::sync::Arc;

use anyhow::{Context, Result};
use sign_semantic_matcher::{Embedder, EmbeddingMatcher, SemanticMatcher};
use tracing::{info, warn};

use crate::config::{NerBackend, Settings};
use crate::entity::{BertNerDetector, EntityDetector, FingerspellPolicy, HeuristicEntityDetector};
use crate::translation::TranslationService;
use crate::video::{FileSystemVideoStore, VideoStore};

/// Build the video store for `settings`
pub fn build_video_store(settings: &Settings) -> Arc<FileSystemVideoStore> {
    Arc::new(FileSystemVideoStore::with_base_url(
        &settings.videos_dir,
        &settings.signs_base_url,
    ))
}

/// Build the embedding matcher over `store`'s vocabulary
pub fn build_matcher(settings: &Settings, store: &dyn VideoStore) -> Result<Arc<dyn SemanticMatcher>> {
    let vocabulary = store
        .get_available_words()
        .context("Failed to read sign vocabulary")?;
    if vocabulary.is_empty() {
        warn!(
            "No sign videos found in {}; every word will be fingerspelled or skipped",
            settings.videos_dir.display()
        );
    }

    let config = settings.matcher_config();
    let embedder = Embedder::with_model(&config.model_name, config.pooling)
        .with_context(|| format!("Failed to load embedding model {}", config.model_name))?;
    let matcher = EmbeddingMatcher::build(embedder, vocabulary.iter(), config.similarity_threshold)
        .context("Failed to build vocabulary index")?;

    Ok(Arc::new(matcher))
}

/// Build the configured entity detector
pub fn build_detector(settings: &Settings) -> Result<Arc<dyn EntityDetector>> {
    let policy = FingerspellPolicy::default();
    match settings.ner_backend {
        NerBackend::Bert => {
            let detector = BertNerDetector::from_hub(&settings.ner_model, policy)
                .with_context(|| format!("Failed to load NER model {}", settings.ner_model))?;
            Ok(Arc::new(detector))
        }
        NerBackend::Heuristic => Ok(Arc::new(HeuristicEntityDetector::new(policy))),
    }
}

/// Build every collaborator and the translation service
pub fn build_service(settings: &Settings) -> Result<TranslationService> {
    info!(
        videos_dir = %settings.videos_dir.display(),
        model = %settings.embedding_model,
        ner = %settings.ner_backend,
        "Building translation service"
    );

    let store = build_video_store(settings);
    let matcher = build_matcher(settings, store.as_ref())?;
    let detector = build_detector(settings)?;

    info!(
        vocabulary = matcher.vocabulary_size(),
        threshold = matcher.threshold(),
        "Translation service ready"
    );

    Ok(TranslationService::new(matcher, detector, store))
}
