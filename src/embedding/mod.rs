//! Embedding generation for semantic search and retrieval.

mod hashing;
mod openai;

pub use hashing::HashingEmbedder;
pub use openai::OpenAIEmbedder;

use crate::config::{EmbeddingProvider, Settings};
use crate::error::EmbeddingError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for a single text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Generate embeddings for multiple texts, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embedding dimensions, if known before the first call.
    fn dimensions(&self) -> Option<usize>;
}

/// Build the embedder selected in `settings`.
pub async fn from_settings(settings: &Settings) -> Result<Arc<dyn Embedder>, EmbeddingError> {
    match settings.embedding.provider {
        EmbeddingProvider::Hashing => Ok(Arc::new(HashingEmbedder::new(
            settings.embedding.dimensions,
        ))),
        EmbeddingProvider::Server => {
            let embedder = OpenAIEmbedder::connect(
                settings.embedding_api_base(),
                settings.embedding_model(),
                Duration::from_secs(settings.llm.timeout_secs),
            )
            .await?;
            Ok(Arc::new(embedder))
        }
    }
}
