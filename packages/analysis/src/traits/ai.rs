//! AI trait for the structured-extraction stage.
//!
//! Implementations wrap a specific LLM provider and handle the mechanics of
//! the request; prompting and response parsing live in the pipeline so they
//! stay provider-independent.

use async_trait::async_trait;

use crate::error::Result;

/// LLM seam for Form 990 analysis.
///
/// Implementations send the document text with the fixed extraction prompt
/// and return the model's raw reply, which the pipeline parses as JSON.
#[async_trait]
pub trait Ai: Send + Sync {
    /// Run the structured-extraction prompt over `text`.
    ///
    /// Returns the raw model output. The pipeline treats anything that is
    /// not the requested JSON shape as a hard failure for that document.
    async fn analyze_form(&self, text: &str) -> Result<String>;
}
