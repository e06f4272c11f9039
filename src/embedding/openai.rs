//! Embeddings from a local OpenAI-compatible server.

use super::Embedder;
use crate::error::EmbeddingError;
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Server-backed embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIEmbedder {
    /// Connect to the server and make sure it answers.
    pub async fn connect(
        api_base: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        let client = create_client(api_base, timeout)
            .map_err(|e| EmbeddingError::ModelLoad(format!("HTTP client: {}", e)))?;

        client.models().list().await.map_err(|e| {
            EmbeddingError::ModelLoad(format!("{} is not reachable at {}: {}", model, api_base, e))
        })?;

        info!("Instantiated embedder with model: {}", model);
        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    /// Embed `texts` as-is, in server-sized batches.
    async fn request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        debug!("Generating embeddings for {} texts", texts.len());

        // Local servers have small batch limits
        const BATCH_SIZE: usize = 32;
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(chunk.to_vec()))
                .build()
                .map_err(|e| EmbeddingError::Inference(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| EmbeddingError::Inference(format!("Embedding API error: {}", e)))?;

            if response.data.len() != chunk.len() {
                return Err(EmbeddingError::Inference(format!(
                    "Expected {} embeddings, server returned {}",
                    chunk.len(),
                    response.data.len()
                )));
            }

            // Sort by index to ensure correct order
            let mut embeddings: Vec<_> = response.data.into_iter().collect();
            embeddings.sort_by_key(|e| e.index);

            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }
}

/// Positions and copies of the texts that are not blank.
fn non_blank(texts: &[String]) -> (Vec<usize>, Vec<String>) {
    texts
        .iter()
        .enumerate()
        .filter(|(_, t)| !t.trim().is_empty())
        .map(|(i, t)| (i, t.clone()))
        .unzip()
}

/// Place `embeddings` at `positions`, zero vectors everywhere else.
fn scatter(
    total: usize,
    positions: &[usize],
    embeddings: Vec<Vec<f32>>,
    dimensions: usize,
) -> Vec<Vec<f32>> {
    let mut out = vec![vec![0.0; dimensions]; total];
    for (&position, embedding) in positions.iter().zip(embeddings) {
        out[position] = embedding;
    }
    out
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Inference("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Servers reject empty inputs, so blank texts get a zero vector.
        let (positions, inputs) = non_blank(texts);
        if inputs.len() == texts.len() {
            return self.request(texts).await;
        }
        debug!("Skipping {} blank texts", texts.len() - inputs.len());

        let embeddings = if inputs.is_empty() {
            Vec::new()
        } else {
            self.request(&inputs).await?
        };
        let dimensions = match embeddings.first() {
            Some(first) => first.len(),
            None => self
                .request(&[" ".to_string()])
                .await?
                .first()
                .map(Vec::len)
                .ok_or_else(|| EmbeddingError::Inference("Empty embedding response".to_string()))?,
        };

        Ok(scatter(texts.len(), &positions, embeddings, dimensions))
    }

    fn dimensions(&self) -> Option<usize> {
        None
    }
}
