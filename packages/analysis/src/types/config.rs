//! Configuration types for batch processing.

use serde::{Deserialize, Serialize};

/// Limits applied to a batch of uploaded documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Maximum size of one document in bytes. Default: 25 MiB.
    pub max_file_size: usize,

    /// Maximum number of documents per batch. Default: 5.
    pub max_files: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size: 25 * 1024 * 1024,
            max_files: 5,
        }
    }
}

impl UploadLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_file_size(mut self, bytes: usize) -> Self {
        self.max_file_size = bytes;
        self
    }

    pub fn with_max_files(mut self, count: usize) -> Self {
        self.max_files = count;
        self
    }
}
