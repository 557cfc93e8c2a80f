//! Testing utilities including mock implementations.
//!
//! Useful for exercising the pipeline and orchestrator without real AI or
//! network calls. [`sample_foundation`] also serves demo callers that want
//! recognizable placeholder data after a failure; it lives here, not in the
//! pipeline, so placeholders can never masquerade as real extractions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::batch::DocumentPipeline;
use crate::error::{AnalysisError, Result};
use crate::traits::Ai;
use crate::types::{ContactInfo, Foundation, Grantee, KeyPerson};

/// Mock [`Ai`] returning a fixed reply (or a fixed failure) and counting
/// calls for assertions.
pub struct MockAi {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl MockAi {
    /// Always reply with `raw` (typically a JSON document).
    pub fn returning(raw: impl Into<String>) -> Self {
        Self {
            reply: Ok(raw.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Always fail with an AI error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `analyze_form` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Ai for MockAi {
    async fn analyze_form(&self, _text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(raw) => Ok(raw.clone()),
            Err(message) => Err(AnalysisError::Ai(message.clone().into())),
        }
    }
}

/// Mock [`DocumentPipeline`] keyed by the document bytes interpreted as
/// UTF-8 (tests pass the file name as the bytes).
#[derive(Default)]
pub struct MockPipeline {
    foundations: HashMap<String, Foundation>,
    text_failures: HashMap<String, String>,
    analyze_failures: HashMap<String, String>,
}

impl MockPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Both stages succeed for this key, producing `foundation`.
    pub fn with_success(mut self, key: impl Into<String>, foundation: Foundation) -> Self {
        self.foundations.insert(key.into(), foundation);
        self
    }

    /// Stage one (text extraction) fails for this key.
    pub fn with_text_failure(mut self, key: impl Into<String>, message: impl Into<String>) -> Self {
        self.text_failures.insert(key.into(), message.into());
        self
    }

    /// Stage two (structured extraction) fails for this key.
    pub fn with_analyze_failure(
        mut self,
        key: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        self.analyze_failures.insert(key.into(), message.into());
        self
    }
}

#[async_trait]
impl DocumentPipeline for MockPipeline {
    async fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let key = String::from_utf8_lossy(bytes).to_string();
        if let Some(message) = self.text_failures.get(&key) {
            return Err(AnalysisError::Pdf(message.clone()));
        }
        Ok(key)
    }

    async fn analyze(&self, text: &str) -> Result<Foundation> {
        if let Some(message) = self.analyze_failures.get(text) {
            return Err(AnalysisError::Ai(message.clone().into()));
        }
        self.foundations
            .get(text)
            .cloned()
            .ok_or_else(|| AnalysisError::Ai(format!("no mock foundation for '{}'", text).into()))
    }
}

/// A recognizable placeholder foundation for demos and tests.
pub fn sample_foundation(name: impl Into<String>) -> Foundation {
    let name = name.into();
    Foundation {
        name: name.clone(),
        ein: "45-1234567".to_string(),
        total_assets: 25_000_000.0,
        total_giving: 1_200_000.0,
        average_grant_amount: 61_000.0,
        median_grant_amount: 50_000.0,
        contact_info: ContactInfo {
            phone: Some("(608) 555-7890".to_string()),
            address: Some("123 Main St, Madison, WI 53703".to_string()),
            website: Some("https://www.example.org".to_string()),
        },
        key_personnel: vec![
            KeyPerson {
                name: "Jane Smith".to_string(),
                role: "Executive Director".to_string(),
            },
            KeyPerson {
                name: "Robert Johnson".to_string(),
                role: "Board Chair".to_string(),
            },
        ],
        grantees: vec![
            Grantee::new(
                "Madison Community Center",
                2023,
                "Madison",
                "WI",
                75_000.0,
                "Community Development",
            ),
            Grantee::new(
                "Wisconsin Education Fund",
                2023,
                "Milwaukee",
                "WI",
                50_000.0,
                "Education",
            ),
            Grantee::new(
                "Midwest Healthcare Initiative",
                2023,
                "Chicago",
                "IL",
                100_000.0,
                "Health",
            ),
            Grantee::new("Arts for All", 2023, "Minneapolis", "MN", 35_000.0, "Arts & Culture"),
            Grantee::new("Green Future Project", 2023, "Madison", "WI", 45_000.0, "Environment"),
        ],
    }
}
