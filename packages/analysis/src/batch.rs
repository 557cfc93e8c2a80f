//! Sequential batch orchestration.
//!
//! Documents run one at a time, in order, so progress reporting stays simple
//! and deterministic. One document's failure is recorded on that document
//! and never aborts its siblings.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::{AnalysisError, Result};
use crate::pdf;
use crate::pipeline;
use crate::traits::Ai;
use crate::types::{DocumentInput, DocumentStatus, Foundation, UploadLimits};

/// The two-stage pipeline seam the orchestrator drives.
///
/// Text extraction must finish before structured extraction starts; the
/// orchestrator calls them in that order for each document.
#[async_trait]
pub trait DocumentPipeline: Send + Sync {
    /// Stage one: PDF bytes to plain text.
    async fn extract_text(&self, bytes: &[u8]) -> Result<String>;

    /// Stage two: plain text to a structured [`Foundation`].
    async fn analyze(&self, text: &str) -> Result<Foundation>;
}

/// In-process pipeline: local PDF parsing plus a direct AI call.
pub struct LocalPipeline<A: Ai> {
    ai: A,
}

impl<A: Ai> LocalPipeline<A> {
    pub fn new(ai: A) -> Self {
        Self { ai }
    }
}

#[async_trait]
impl<A: Ai> DocumentPipeline for LocalPipeline<A> {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        pdf::extract_text_async(bytes.to_vec()).await
    }

    async fn analyze(&self, text: &str) -> Result<Foundation> {
        pipeline::analyze_text(&self.ai, text).await
    }
}

/// Terminal outcome for one document.
///
/// The payload is an explicit `Result`: callers that want to show
/// placeholder data on failure make that substitution themselves, visibly,
/// rather than receiving fakes indistinguishable from real extractions.
#[derive(Debug)]
pub struct DocumentOutcome {
    pub id: Uuid,
    pub file_name: String,
    pub result: Result<Foundation>,
}

impl DocumentOutcome {
    pub fn status(&self) -> DocumentStatus {
        match self.result {
            Ok(_) => DocumentStatus::Success,
            Err(_) => DocumentStatus::Error,
        }
    }
}

/// Progress notification emitted after each status change.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub document_id: Uuid,
    pub file_name: String,
    pub status: DocumentStatus,
    /// Documents that have reached a terminal state so far.
    pub processed_files: usize,
    pub total_files: usize,
}

/// Result of running a whole batch.
#[derive(Debug)]
pub struct BatchReport {
    pub outcomes: Vec<DocumentOutcome>,
    pub total_files: usize,
    pub processed_files: usize,
}

impl BatchReport {
    /// Successfully extracted foundations, in submission order.
    pub fn foundations(&self) -> Vec<&Foundation> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok())
            .collect()
    }

    /// Number of documents that ended in `Error`.
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }
}

/// Drives documents through the two-stage pipeline sequentially.
pub struct BatchProcessor<P: DocumentPipeline> {
    pipeline: P,
    limits: UploadLimits,
}

impl<P: DocumentPipeline> BatchProcessor<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            limits: UploadLimits::default(),
        }
    }

    pub fn with_limits(mut self, limits: UploadLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Process every document in order, invoking `on_progress` after each
    /// status change.
    ///
    /// Rejects the whole batch up front when it exceeds the file-count
    /// limit. Oversized individual documents become error outcomes, not
    /// batch failures.
    pub async fn process_all(
        &self,
        documents: Vec<DocumentInput>,
        mut on_progress: impl FnMut(&ProgressUpdate) + Send,
    ) -> Result<BatchReport> {
        if documents.len() > self.limits.max_files {
            return Err(AnalysisError::TooManyFiles {
                count: documents.len(),
                limit: self.limits.max_files,
            });
        }

        let total_files = documents.len();
        let mut outcomes = Vec::with_capacity(total_files);
        let mut processed_files = 0;

        for document in documents {
            on_progress(&ProgressUpdate {
                document_id: document.id,
                file_name: document.file_name.clone(),
                status: DocumentStatus::Processing,
                processed_files,
                total_files,
            });

            let result = self.process_one(&document).await;
            if let Err(error) = &result {
                tracing::warn!(
                    file = %document.file_name,
                    %error,
                    "document failed, continuing with remaining files"
                );
            }

            let outcome = DocumentOutcome {
                id: document.id,
                file_name: document.file_name,
                result,
            };

            processed_files += 1;
            on_progress(&ProgressUpdate {
                document_id: outcome.id,
                file_name: outcome.file_name.clone(),
                status: outcome.status(),
                processed_files,
                total_files,
            });
            outcomes.push(outcome);
        }

        Ok(BatchReport {
            outcomes,
            total_files,
            processed_files,
        })
    }

    async fn process_one(&self, document: &DocumentInput) -> Result<Foundation> {
        if document.bytes.len() > self.limits.max_file_size {
            return Err(AnalysisError::FileTooLarge {
                size: document.bytes.len(),
                limit: self.limits.max_file_size,
            });
        }

        let text = self.pipeline.extract_text(&document.bytes).await?;
        self.pipeline.analyze(&text).await
    }
}
