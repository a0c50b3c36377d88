//! Anthropic Messages API backend implementation.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use ideaforge_core::{defaults, Error, GenerationBackend, Result};

use super::error::{to_ideaforge_error, AnthropicErrorCode};
use super::types::*;

/// Configuration for the Anthropic backend.
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// Base URL for the API (without the `/v1/messages` path).
    pub base_url: String,
    /// API key sent as `x-api-key`.
    pub api_key: String,
    /// Model to use for generation.
    pub model: String,
    /// Maximum tokens requested per response.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::ANTHROPIC_URL.to_string(),
            api_key: String::new(),
            model: defaults::LLM_MODEL.to_string(),
            max_tokens: defaults::LLM_MAX_TOKENS,
            timeout_seconds: defaults::LLM_TIMEOUT_SECS,
        }
    }
}

/// Anthropic Messages API backend.
pub struct AnthropicBackend {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicBackend {
    /// Create a new backend with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::Config("Anthropic API key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            component = "anthropic",
            op = "init",
            url = %config.base_url,
            model = %config.model,
            timeout_secs = config.timeout_seconds,
            "Initializing Anthropic backend"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    ///
    /// `ANTHROPIC_API_KEY` is required; `LLM_MODEL`, `ANTHROPIC_BASE_URL`
    /// and `LLM_TIMEOUT_SECS` override the defaults.
    pub fn from_env() -> Result<Self> {
        let config = AnthropicConfig {
            base_url: std::env::var("ANTHROPIC_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::ANTHROPIC_URL.to_string()),
            api_key: std::env::var("ANTHROPIC_API_KEY").map_err(|_| {
                Error::Config("ANTHROPIC_API_KEY environment variable is required".to_string())
            })?,
            model: std::env::var("LLM_MODEL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| defaults::LLM_MODEL.to_string()),
            max_tokens: defaults::LLM_MAX_TOKENS,
            timeout_seconds: std::env::var("LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::LLM_TIMEOUT_SECS),
        };

        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Build a messages request with authentication headers.
    fn build_request(&self) -> reqwest::RequestBuilder {
        let url = format!(
            "{}/v1/messages",
            self.config.base_url.trim_end_matches('/')
        );

        self.client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", defaults::ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
    }
}

#[async_trait]
impl GenerationBackend for AnthropicBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        debug!(
            subsystem = "inference",
            component = "anthropic",
            op = "generate",
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Generating"
        );

        let request = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: system.to_string(),
            messages: vec![Message::user(prompt)],
        };

        let response = self
            .build_request()
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let (error_type, message) = match serde_json::from_str::<ErrorResponse>(&body) {
                Ok(parsed) => (parsed.error.error_type, parsed.error.message),
                Err(_) => (String::new(), body),
            };
            let code = AnthropicErrorCode::from_response(status.as_u16(), &error_type);
            warn!(
                subsystem = "inference",
                component = "anthropic",
                op = "generate",
                status = status.as_u16(),
                error_type = %error_type,
                retryable = code.is_retryable(),
                duration_ms = start.elapsed().as_millis() as u64,
                "Anthropic request failed"
            );
            return Err(to_ideaforge_error(
                code,
                &format!("Anthropic returned {}: {}", status, message),
            ));
        }

        let result: MessagesResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        if let Some(err) = result.error {
            return Err(Error::Inference(format!("API error: {}", err.message)));
        }

        let content = match result.content.first() {
            Some(block) if block.block_type == "text" => block.text.clone(),
            _ => {
                return Err(Error::Inference(
                    "Unexpected response format: first content block is not text".to_string(),
                ))
            }
        };

        debug!(
            subsystem = "inference",
            component = "anthropic",
            op = "generate",
            response_len = content.len(),
            stop_reason = result.stop_reason.as_deref().unwrap_or(""),
            duration_ms = start.elapsed().as_millis() as u64,
            "Generation complete"
        );
        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
