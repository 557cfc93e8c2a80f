//! PDF upload and text extraction endpoint.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use analysis::{cache, pdf, AnalysisError};

use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Serialize)]
pub struct ProcessPdfResponse {
    pub text: String,
}

/// `POST /api/process-pdf`
///
/// Accepts a multipart form with a single `file` field containing a PDF,
/// extracts its text, and returns `{text}`. Extraction results are cached
/// by content hash, so re-uploading the same bytes never re-parses.
pub async fn process_pdf_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ProcessPdfResponse>, ApiError> {
    let mut multipart =
        multipart.map_err(|_| ApiError::bad_request("Request must be multipart/form-data"))?;

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::bad_request(format!("Invalid multipart body: {}", err)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.contains("pdf") {
            return Err(ApiError::bad_request("File must be a PDF"));
        }

        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|err| ApiError::bad_request(format!("Failed to read file: {}", err)))?;
        file = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = file.ok_or_else(|| ApiError::bad_request("No file provided"))?;

    if bytes.len() > state.config.max_file_size {
        return Err(ApiError::from_analysis(
            "Failed to process PDF",
            AnalysisError::FileTooLarge {
                size: bytes.len(),
                limit: state.config.max_file_size,
            },
        ));
    }

    tracing::info!(file = %file_name, size = bytes.len(), "processing uploaded PDF");

    let key = cache::content_key("process-pdf", &bytes);
    let text = state
        .text_cache
        .get_or_compute(&key, state.config.cache_pdf_ttl, || {
            pdf::extract_text_async(bytes)
        })
        .await
        .map_err(|err| ApiError::from_analysis("Failed to extract text from PDF", err))?;

    Ok(Json(ProcessPdfResponse { text }))
}
