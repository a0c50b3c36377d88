//! Mock generation backend for deterministic testing.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ideaforge_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_expansion("Set Up Pi-hole", "homelab", "# Set Up Pi-hole\n\n- [ ] Flash SD card");
//!
//! let text = backend.generate("set up pihole").await.unwrap();
//! assert_eq!(backend.generate_call_count(), 1);
//! ```

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use ideaforge_core::{Error, GenerationBackend, Result};

/// Mock generation backend for testing.
#[derive(Clone)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    model: String,
    response: String,
    latency: Duration,
    failure: Option<String>,
}

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            model: "mock-model".to_string(),
            response: expansion_json("Mock Note", "personal", "# Mock Note\n\n- [ ] Do it"),
            latency: Duration::ZERO,
            failure: None,
        }
    }
}

/// Build the JSON body a well-behaved model would answer with.
pub fn expansion_json(title: &str, category: &str, markdown: &str) -> String {
    serde_json::json!({
        "title": title,
        "category": category,
        "markdown": markdown,
    })
    .to_string()
}

impl MockGenerationBackend {
    /// Create a new mock backend with default configuration.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Return this exact text from every generation request.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).response = response.into();
        self
    }

    /// Answer with a well-formed expansion object.
    pub fn with_expansion(self, title: &str, category: &str, markdown: &str) -> Self {
        self.with_fixed_response(expansion_json(title, category, markdown))
    }

    /// Set simulated latency for every call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Fail every call with an inference error carrying `message`.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn get_calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Get number of generation calls.
    pub fn generate_call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }
}

impl Default for MockGenerationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.generate_with_system("", prompt).await
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        match &self.config.failure {
            Some(message) => Err(Error::Inference(message.clone())),
            None => Ok(self.config.response.clone()),
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
