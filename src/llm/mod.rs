//! Answer generation with a local language model.

mod openai;

pub use openai::OpenAIGenerator;

use crate::config::Settings;
use crate::error::GenerationError;
use async_trait::async_trait;
use std::time::Duration;

/// Generation parameters fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    /// Context window in tokens.
    pub context_window: usize,
    pub temperature: f32,
    /// Tokens reserved for the answer.
    pub max_tokens: usize,
    pub gpu: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            context_window: 4000,
            temperature: 0.0,
            max_tokens: 256,
            gpu: true,
        }
    }
}

impl GenerationConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            model: settings.llm.model.clone(),
            context_window: settings.llm.context_window,
            temperature: settings.llm.temperature,
            max_tokens: settings.llm.max_tokens,
            gpu: settings.llm.gpu,
        }
    }

    /// Tokens available for the prompt.
    pub fn prompt_budget(&self) -> usize {
        self.context_window.saturating_sub(self.max_tokens)
    }

    /// Fail if `prompt` would not fit next to the answer.
    pub fn check_fits(&self, prompt: &str) -> Result<(), GenerationError> {
        let prompt_tokens = estimate_tokens(prompt);
        if prompt_tokens > self.prompt_budget() {
            return Err(GenerationError::ContextOverflow {
                prompt_tokens,
                max_tokens: self.max_tokens,
                context_window: self.context_window,
            });
        }
        Ok(())
    }
}

/// Rough characters-per-token ratio for English text.
pub const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of `text`.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Trait for text generation.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// The configuration the generator was built with.
    fn config(&self) -> &GenerationConfig;
}

/// Connect the generator described by `settings`.
pub async fn from_settings(settings: &Settings) -> Result<OpenAIGenerator, GenerationError> {
    OpenAIGenerator::connect(
        &settings.llm.api_base,
        GenerationConfig::from_settings(settings),
        Duration::from_secs(settings.llm.timeout_secs),
    )
    .await
}
