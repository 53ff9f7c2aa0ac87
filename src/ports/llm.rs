/// LLM service port trait
///
/// Defines the interface for Large Language Model services.
/// Implementations: Google Gemini.
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for LLM requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name (e.g., "gemini-1.5-flash")
    pub model: String,

    /// Temperature for generation (0.0 to 1.0)
    pub temperature: Option<f32>,

    /// Maximum tokens in response
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gemini-1.5-flash".to_string(),
            temperature: Some(0.2), // Extraction wants deterministic JSON
            max_tokens: Some(4096),
        }
    }
}

/// Port trait for LLM services
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmServicePort: Send + Sync {
    /// Run a single prompt and return the model's text
    async fn generate(&self, prompt: &str, config: &LlmConfig) -> Result<String>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Check if the service is configured (has API key)
    fn is_configured(&self) -> bool;
}
