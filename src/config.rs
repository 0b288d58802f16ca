//! Service configuration
//!
//! Reads config from env vars (a `.env` file in the working directory is
//! loaded first when present):
//!
//! | Variable | Default |
//! |----------|---------|
//! | `SIGNBRIDGE_APP_NAME` | `Sign Language Translation API` |
//! | `SIGNBRIDGE_APP_VERSION` | crate version |
//! | `SIGNBRIDGE_HOST` | `0.0.0.0` |
//! | `SIGNBRIDGE_PORT` | `7860` |
//! | `SIGNBRIDGE_CORS_ORIGINS` | localhost:5173, :3000, :8080 |
//! | `SIGNBRIDGE_VIDEOS_DIR` | `data/sign_animations` |
//! | `SIGNBRIDGE_SIGNS_BASE_URL` | `/signs` |
//! | `SIGNBRIDGE_EMBEDDING_MODEL` | `sentence-transformers/all-MiniLM-L6-v2` |
//! | `SIGNBRIDGE_EMBEDDING_POOLING` | `mean` |
//! | `SIGNBRIDGE_SIMILARITY_THRESHOLD` | `0.7` |
//! | `SIGNBRIDGE_NER_BACKEND` | `bert` |
//! | `SIGNBRIDGE_NER_MODEL` | `dslim/bert-base-NER` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use sign_semantic_matcher::{MatcherConfig, Pooling, DEFAULT_MODEL, DEFAULT_SIMILARITY_THRESHOLD};

use crate::entity::DEFAULT_NER_MODEL;
use crate::error::ConfigError;
use crate::video::DEFAULT_BASE_URL;

const ENV_PREFIX: &str = "SIGNBRIDGE_";

const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:8080",
];

/// Which entity detector to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NerBackend {
    /// Candle BERT token classifier
    #[default]
    Bert,
    /// Capitalisation rules, no model download
    Heuristic,
}

impl FromStr for NerBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bert" => Ok(NerBackend::Bert),
            "heuristic" => Ok(NerBackend::Heuristic),
            other => Err(format!("unknown NER backend '{other}' (expected bert|heuristic)")),
        }
    }
}

impl fmt::Display for NerBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NerBackend::Bert => write!(f, "bert"),
            NerBackend::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub app_name: String,
    pub app_version: String,
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub videos_dir: PathBuf,
    /// URL prefix sign videos are served under
    pub signs_base_url: String,
    pub embedding_model: String,
    pub embedding_pooling: Pooling,
    pub similarity_threshold: f32,
    pub ner_backend: NerBackend,
    pub ner_model: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app_name: "Sign Language Translation API".to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            host: "0.0.0.0".to_string(),
            port: 7860,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            videos_dir: PathBuf::from("data/sign_animations"),
            signs_base_url: DEFAULT_BASE_URL.to_string(),
            embedding_model: DEFAULT_MODEL.to_string(),
            embedding_pooling: Pooling::Mean,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            ner_backend: NerBackend::Bert,
            ner_model: DEFAULT_NER_MODEL.to_string(),
        }
    }
}

impl Settings {
    /// Load `.env` (if any) and read settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    ///
    /// `lookup` receives full variable names (`SIGNBRIDGE_PORT`). Unset or
    /// blank variables keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| -> Option<(String, String)> {
            let var = format!("{ENV_PREFIX}{name}");
            lookup(&var)
                .filter(|value| !value.trim().is_empty())
                .map(|value| (var, value))
        };

        let mut settings = Settings::default();

        if let Some((_, value)) = get("APP_NAME") {
            settings.app_name = value;
        }
        if let Some((_, value)) = get("APP_VERSION") {
            settings.app_version = value;
        }
        if let Some((_, value)) = get("HOST") {
            settings.host = value.trim().to_string();
        }
        if let Some((var, value)) = get("PORT") {
            settings.port = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(&var, &value, "not a port number"))?;
        }
        if let Some((_, value)) = get("CORS_ORIGINS") {
            settings.cors_origins = parse_cors_origins(&value)?;
        }
        if let Some((_, value)) = get("VIDEOS_DIR") {
            settings.videos_dir = PathBuf::from(value.trim());
        }
        if let Some((_, value)) = get("SIGNS_BASE_URL") {
            settings.signs_base_url = value.trim().to_string();
        }
        if let Some((_, value)) = get("EMBEDDING_MODEL") {
            settings.embedding_model = value.trim().to_string();
        }
        if let Some((var, value)) = get("EMBEDDING_POOLING") {
            settings.embedding_pooling = value
                .parse()
                .map_err(|reason: String| ConfigError::invalid(&var, &value, reason))?;
        }
        if let Some((var, value)) = get("SIMILARITY_THRESHOLD") {
            settings.similarity_threshold = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::invalid(&var, &value, "not a number"))?;
        }
        if let Some((var, value)) = get("NER_BACKEND") {
            settings.ner_backend = value
                .parse()
                .map_err(|reason: String| ConfigError::invalid(&var, &value, reason))?;
        }
        if let Some((_, value)) = get("NER_MODEL") {
            settings.ner_model = value.trim().to_string();
        }

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.similarity_threshold;
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::invalid(
                &format!("{ENV_PREFIX}SIMILARITY_THRESHOLD"),
                &threshold.to_string(),
                "must be within [0, 1]",
            ));
        }
        if !self.signs_base_url.starts_with('/') && !self.signs_base_url.contains("://") {
            return Err(ConfigError::invalid(
                &format!("{ENV_PREFIX}SIGNS_BASE_URL"),
                &self.signs_base_url,
                "must be an absolute path or URL",
            ));
        }
        Ok(())
    }

    pub fn matcher_config(&self) -> MatcherConfig {
        MatcherConfig {
            model_name: self.embedding_model.clone(),
            pooling: self.embedding_pooling,
            similarity_threshold: self.similarity_threshold,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Comma-separated list, or a JSON array when the value starts with `[`
fn parse_cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        return serde_json::from_str::<Vec<String>>(raw)
            .map_err(|e| ConfigError::CorsOrigins(e.to_string()));
    }
    Ok(raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect())
}
