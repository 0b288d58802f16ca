//! Route handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use super::schemas::{
    ErrorBody, HealthResponse, ServiceInfo, TranslateRequest, TranslateResponse,
};
use super::{AppState, HEALTH_PATH};

/// Error response carrying `{success: false, detail}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            detail: self.detail,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

/// GET /
pub async fn root(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: state.settings.app_name.clone(),
        version: state.settings.app_version.clone(),
        health: HEALTH_PATH.to_string(),
    })
}

/// GET /api/v1/health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.settings.app_version.clone(),
        available_words: state.service.available_word_count(),
    })
}

/// POST /api/v1/translate
///
/// Translation is CPU and model bound, so it runs on the blocking pool.
pub async fn translate(
    State(state): State<AppState>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(request) = payload?;
    if let Some(detail) = request.validation_error() {
        return Err(ApiError::unprocessable(detail));
    }

    let service = state.service.clone();
    let text = request.text;
    let result = tokio::task::spawn_blocking(move || service.translate(&text))
        .await
        .map_err(|e| {
            tracing::error!("Translation task failed: {}", e);
            ApiError::internal(format!("Translation failed: {e}"))
        })?
        .map_err(|e| {
            tracing::error!("Translation failed: {}", e);
            ApiError::internal(format!("Translation failed: {e}"))
        })?;

    Ok(Json(TranslateResponse::from(result)))
}
