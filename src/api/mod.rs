//! HTTP API
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /` | service info |
//! | `GET /api/v1/health` | status and vocabulary size |
//! | `POST /api/v1/translate` | text to sign translation |
//! | `GET /signs/*` | sign video files (when the directory exists) |

pub mod handlers;
pub mod schemas;

use std::sync::Arc;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::translation::TranslationService;

pub const HEALTH_PATH: &str = "/api/v1/health";
pub const TRANSLATE_PATH: &str = "/api/v1/translate";

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TranslationService>,
    pub settings: Arc<Settings>,
}

impl AppState {
    pub fn new(service: TranslationService, settings: Settings) -> Self {
        Self {
            service: Arc::new(service),
            settings: Arc::new(settings),
        }
    }
}

/// Build the full axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.settings.cors_origins);
    let videos_dir = state.settings.videos_dir.clone();
    let signs_mount = state
        .settings
        .signs_base_url
        .trim_end_matches('/')
        .to_string();

    let mut router = Router::new()
        .route("/", get(handlers::root))
        .route(HEALTH_PATH, get(handlers::health))
        .route(TRANSLATE_PATH, post(handlers::translate))
        .with_state(state);

    // Only a path-style base URL below the root can be served locally
    if videos_dir.is_dir() && signs_mount.starts_with('/') && signs_mount.len() > 1 {
        tracing::info!("Serving sign videos from {} at {}", videos_dir.display(), signs_mount);
        router = router.nest_service(&signs_mount, ServeDir::new(videos_dir));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
