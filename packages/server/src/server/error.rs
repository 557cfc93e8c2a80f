//! HTTP error responses.
//!
//! Every failure surfaces as `{error}` or `{error, details}` JSON with an
//! appropriate status: validation problems are 4xx, upstream and extraction
//! failures are 5xx and are never retried automatically.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use analysis::AnalysisError;

/// JSON error body returned by every route.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details: None,
        }
    }

    pub fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Some(details.into()),
        }
    }

    /// Map a library error under a route-specific headline message.
    ///
    /// Input-validation failures keep their own message as the 400 body;
    /// everything else becomes a 500 with the library error as detail.
    pub fn from_analysis(headline: &str, error: AnalysisError) -> Self {
        if error.is_input_error() {
            Self::bad_request(error.to_string())
        } else {
            Self::internal(headline, error.to_string())
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_400() {
        let error = ApiError::from_analysis(
            "Failed to process PDF",
            AnalysisError::invalid_input("File must be a PDF"),
        );
        assert_eq!(error.status, StatusCode::BAD_REQUEST);
        assert_eq!(error.error, "invalid input: File must be a PDF");
        assert!(error.details.is_none());
    }

    #[test]
    fn upstream_errors_map_to_500_with_details() {
        let error = ApiError::from_analysis(
            "Failed to analyze 990 form",
            AnalysisError::Ai("model unavailable".into()),
        );
        assert_eq!(error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.error, "Failed to analyze 990 form");
        assert_eq!(error.details.as_deref(), Some("AI service error: model unavailable"));
    }
}
