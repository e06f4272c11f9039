//! Configuration module for askmypdf.
//!
//! Handles loading settings, env-style overrides and prompt templates.

pub mod env;
mod prompts;
mod settings;

pub use env::EnvOverrides;
pub use prompts::{Prompts, RagPrompts};
pub use settings::{
    DocumentSettings, EmbeddingProvider, EmbeddingSettings, GeneralSettings, LlmSettings,
    PromptSettings, RetrievalSettings, Settings,
};
