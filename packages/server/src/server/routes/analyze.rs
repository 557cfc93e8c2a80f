//! Form 990 analysis endpoint.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use analysis::{cache, pipeline, Foundation};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `POST /api/analyze-990`
///
/// Takes extracted 990 text and returns structured foundation data from the
/// LLM. Responses are cached by content hash of the input text.
pub async fn analyze_990_handler(
    State(state): State<AppState>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Foundation>, ApiError> {
    let Json(request) =
        body.map_err(|_| ApiError::bad_request("Failed to parse request body"))?;

    let text = match request.text {
        Some(text) if !text.trim().is_empty() => text,
        _ => return Err(ApiError::bad_request("No text provided")),
    };

    tracing::info!(chars = text.len(), "analyzing 990 text");

    let key = cache::content_key("analyze-990", text.as_bytes());
    let foundation = state
        .analysis_cache
        .get_or_compute(&key, state.config.cache_analysis_ttl, || {
            pipeline::analyze_text(state.ai.as_ref(), &text)
        })
        .await
        .map_err(|err| ApiError::from_analysis("Failed to analyze 990 form", err))?;

    Ok(Json(foundation))
}
