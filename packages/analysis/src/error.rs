//! Typed errors for the analysis library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur while analyzing Form 990 documents.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Caller-supplied input was rejected before any work started
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// More documents submitted than the configured limit allows
    #[error("too many files: {count} exceeds limit of {limit}")]
    TooManyFiles { count: usize, limit: usize },

    /// A single document exceeds the configured size limit
    #[error("file too large: {size} bytes exceeds limit of {limit}")]
    FileTooLarge { size: usize, limit: usize },

    /// PDF text extraction failed
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    /// A PDF produced no text at all
    #[error("no text content found in document")]
    EmptyDocument,

    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    Ai(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The LLM reply was not the JSON shape we asked for
    #[error("malformed analysis response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl AnalysisError {
    /// Convenience constructor for input-validation failures.
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// True for errors the caller caused (mapped to 4xx at the HTTP edge).
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::TooManyFiles { .. } | Self::FileTooLarge { .. }
        )
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
