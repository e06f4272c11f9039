//! Completions from a local OpenAI-compatible server.

use super::{GenerationConfig, Generator};
use crate::error::GenerationError;
use crate::openai::create_client;
use async_openai::types::CreateCompletionRequestArgs;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Server-backed generator using the plain completions endpoint.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    config: GenerationConfig,
}

impl OpenAIGenerator {
    /// Connect to the server and make sure it answers.
    pub async fn connect(
        api_base: &str,
        config: GenerationConfig,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = create_client(api_base, timeout)
            .map_err(|e| GenerationError::ModelLoad(format!("HTTP client: {}", e)))?;

        client.models().list().await.map_err(|e| {
            GenerationError::ModelLoad(format!(
                "{} is not reachable at {}: {}",
                config.model, api_base, e
            ))
        })?;

        info!(
            "Instantiated generator with model: {} (n_ctx={}, temperature={}, gpu={})",
            config.model, config.context_window, config.temperature, config.gpu
        );
        Ok(Self { client, config })
    }
}

#[async_trait]
impl Generator for OpenAIGenerator {
    #[instrument(skip(self, prompt), fields(prompt_chars = prompt.len()))]
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.config.check_fits(prompt)?;

        let request = CreateCompletionRequestArgs::default()
            .model(&self.config.model)
            .prompt(prompt)
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens as u32)
            .build()
            .map_err(|e| GenerationError::Inference(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .completions()
            .create(request)
            .await
            .map_err(|e| GenerationError::Inference(format!("Completion API error: {}", e)))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .map(|c| c.text)
            .ok_or_else(|| GenerationError::Inference("Empty response from model".to_string()))?;

        debug!("Generated {} chars", text.len());
        Ok(text)
    }

    fn config(&self) -> &GenerationConfig {
        &self.config
    }
}
