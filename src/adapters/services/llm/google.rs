//! Google Gemini LLM service adapter
//!
//! Implements the LlmServicePort for Google's Gemini generateContent API.

use crate::error::{AppError, Result};
use crate::ports::llm::{LlmConfig, LlmServicePort};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const GOOGLE_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The key goes in this header so it never appears in a request URL
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Google Gemini service implementation
pub struct GoogleService {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Normalize "gemini-pro" and "models/gemini-pro" to the latter
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

/// Concatenated text of the first candidate
fn response_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = match response.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            let reason = response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(AppError::Llm(format!(
                "No candidates returned (block reason: {})",
                reason
            )));
        }
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AppError::Llm(format!(
            "Empty response (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

impl GoogleService {
    /// Create a new Google Gemini service with the given API key
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: GOOGLE_API_BASE.to_string(),
        })
    }

    /// Point the adapter at a different API root (builder pattern)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl LlmServicePort for GoogleService {
    async fn generate(&self, prompt: &str, config: &LlmConfig) -> Result<String> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_tokens,
            }),
        };

        let model_name = model_path(&config.model);
        log::info!("Calling Google generateContent with model: {}", model_name);

        let response = self
            .client
            .post(format!("{}/{}:generateContent", self.base_url, model_name))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                AppError::Llm(format!("GenerateContent request failed: {}", e.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "GenerateContent failed ({}): {}",
                status, error_text
            )));
        }

        let content_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::Llm(format!("Failed to parse content response: {}", e.without_url()))
            })?;

        let content = response_text(content_response)?;
        log::info!(
            "Google completion successful, generated {} characters",
            content.len()
        );

        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "google"
    }

    fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}
