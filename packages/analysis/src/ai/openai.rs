//! OpenAI implementation of the [`Ai`] trait.
//!
//! Talks to the chat completions API with `response_format: json_object` so
//! the model is constrained to reply with JSON.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::pipeline::prompts::ANALYZE_990_PROMPT;
use crate::traits::Ai;

/// Default bound on one chat completion call. Form 990 filings produce long
/// prompts, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// OpenAI-backed analyzer.
#[derive(Clone)]
pub struct OpenAi {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAi {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            client,
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 4000,
            temperature: 0.3,
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| AnalysisError::Config("OPENAI_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the completion token budget (default: 4000).
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature (default: 0.3).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Ai(
                format!("OpenAI API error: {}", error_text).into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::Ai(e.to_string().into()))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AnalysisError::Ai("No response from OpenAI".into()))
    }
}

#[async_trait]
impl Ai for OpenAi {
    async fn analyze_form(&self, text: &str) -> Result<String> {
        tracing::debug!(model = %self.model, chars = text.len(), "calling OpenAI for 990 analysis");
        self.chat(ANALYZE_990_PROMPT, text).await
    }
}

// Request/Response types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}
