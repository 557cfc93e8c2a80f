//! Per-document processing state.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of one uploaded document.
///
/// Legal transitions are `Pending -> Processing -> Success` and
/// `Pending -> Processing -> Error`. Both end states are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Success,
    Error,
}

impl DocumentStatus {
    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition(self, next: DocumentStatus) -> bool {
        matches!(
            (self, next),
            (DocumentStatus::Pending, DocumentStatus::Processing)
                | (DocumentStatus::Processing, DocumentStatus::Success)
                | (DocumentStatus::Processing, DocumentStatus::Error)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, DocumentStatus::Success | DocumentStatus::Error)
    }
}

/// One uploaded document queued for processing.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub id: Uuid,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DocumentInput {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.into(),
            bytes,
        }
    }
}
