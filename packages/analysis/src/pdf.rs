//! PDF text extraction.
//!
//! Thin wrapper over the `pdf-extract` crate. Parsing is CPU-bound, so the
//! async entry point pushes it onto the blocking pool.

use crate::error::{AnalysisError, Result};

/// Documents yielding less text than this are probably scanned images; real
/// OCR would be needed to read them and is out of scope here.
const LIKELY_SCANNED_THRESHOLD: usize = 500;

/// Extract plain text from PDF bytes.
///
/// Fails with [`AnalysisError::EmptyDocument`] when the document contains no
/// text at all (an image-only scan, for example).
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AnalysisError::Pdf(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(AnalysisError::EmptyDocument);
    }

    if text.len() < LIKELY_SCANNED_THRESHOLD {
        tracing::warn!(
            chars = text.len(),
            "PDF yielded very little text; document may be scanned and need OCR"
        );
    }

    Ok(text)
}

/// Async wrapper that runs extraction on the blocking pool.
pub async fn extract_text_async(bytes: Vec<u8>) -> Result<String> {
    tokio::task::spawn_blocking(move || extract_text(&bytes))
        .await
        .map_err(|e| AnalysisError::Pdf(format!("extraction task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let result = extract_text(b"this is not a pdf");
        assert!(matches!(result, Err(AnalysisError::Pdf(_))));
    }

    #[tokio::test]
    async fn async_wrapper_propagates_errors() {
        let result = extract_text_async(b"still not a pdf".to_vec()).await;
        assert!(matches!(result, Err(AnalysisError::Pdf(_))));
    }
}
