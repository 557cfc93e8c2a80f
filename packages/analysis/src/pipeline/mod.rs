//! Two-stage extraction pipeline.
//!
//! Stage one turns PDF bytes into plain text ([`crate::pdf`]); stage two
//! sends the text through an [`Ai`] implementation with the fixed Form 990
//! prompt and parses the structured reply. The stages are independent remote
//! calls, so either can be cached or invoked on its own.

pub mod parse;
pub mod prompts;

pub use parse::{grant_stats, parse_foundation};
pub use prompts::{analyze_prompt_hash, ANALYZE_990_PROMPT};

use crate::error::Result;
use crate::traits::Ai;
use crate::types::Foundation;

/// Run the structured-extraction stage over already-extracted text.
///
/// Malformed JSON from the model is a hard failure for the document; there
/// is no partial recovery.
pub async fn analyze_text(ai: &dyn Ai, text: &str) -> Result<Foundation> {
    let raw = ai.analyze_form(text).await?;
    let foundation = parse_foundation(&raw)?;
    tracing::info!(
        foundation = %foundation.name,
        grantees = foundation.grantees.len(),
        "structured extraction complete"
    );
    Ok(foundation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::testing::MockAi;

    #[tokio::test]
    async fn analyze_text_parses_mock_reply() {
        let ai = MockAi::returning(
            r#"{"name": "Mock Foundation", "ein": "11-1111111", "grantees": []}"#,
        );
        let foundation = analyze_text(&ai, "some 990 text").await.unwrap();
        assert_eq!(foundation.name, "Mock Foundation");
        assert_eq!(ai.call_count(), 1);
    }

    #[tokio::test]
    async fn non_json_reply_fails_hard() {
        let ai = MockAi::returning("I could not find any structured data.");
        let result = analyze_text(&ai, "text").await;
        assert!(matches!(result, Err(AnalysisError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn ai_failure_propagates() {
        let ai = MockAi::failing("rate limited upstream");
        let result = analyze_text(&ai, "text").await;
        assert!(matches!(result, Err(AnalysisError::Ai(_))));
    }
}
