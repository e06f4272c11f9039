//! Knowledge base: the pages of one document, embedded and searchable.

use super::{mmr, MemoryVectorStore, Retriever, RetrieverConfig, SearchResult};
use crate::embedding::Embedder;
use crate::error::{EmbeddingError, QueryError};
use crate::loader::Page;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Pages and embeddings for a single document.
///
/// Built once and read-only afterwards.
pub struct KnowledgeBase {
    store: MemoryVectorStore,
    embedder: Arc<dyn Embedder>,
}

impl KnowledgeBase {
    /// Embed every page and index it.
    #[instrument(skip(pages, embedder), fields(pages = pages.len()))]
    pub async fn build(
        pages: Vec<Page>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, EmbeddingError> {
        let texts: Vec<String> = pages.iter().map(|p| p.text.clone()).collect();
        let embeddings = embedder.embed_batch(&texts).await?;

        if embeddings.len() != pages.len() {
            return Err(EmbeddingError::Inference(format!(
                "Expected {} embeddings, got {}",
                pages.len(),
                embeddings.len()
            )));
        }

        let mut store = MemoryVectorStore::new();
        for (page, embedding) in pages.into_iter().zip(embeddings) {
            store.insert(page, embedding)?;
        }

        info!(
            "Built knowledge base with {} pages ({} dimensions)",
            store.len(),
            store.dimensions().unwrap_or(0)
        );
        Ok(Self { store, embedder })
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// All indexed pages in load order.
    pub fn pages(&self) -> impl Iterator<Item = &Page> {
        self.store.entries().iter().map(|e| &e.page)
    }

    async fn embed_query(&self, query: &str) -> Result<Vec<f32>, QueryError> {
        let embedding = self.embedder.embed(query).await?;
        self.store.check_dimensions(&embedding)?;
        Ok(embedding)
    }

    /// Pages ranked by similarity to `query`.
    pub async fn similarity_search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>, QueryError> {
        let embedding = self.embed_query(query).await?;
        Ok(self.store.search(&embedding, limit))
    }

    /// Up to `k` pages chosen by maximal marginal relevance from the
    /// `fetch_k` nearest neighbours of `query`.
    #[instrument(skip(self, query))]
    pub async fn max_marginal_relevance_search(
        &self,
        query: &str,
        k: usize,
        fetch_k: usize,
        lambda: f32,
    ) -> Result<Vec<SearchResult>, QueryError> {
        let embedding = self.embed_query(query).await?;

        let pool = self.store.nearest(&embedding, fetch_k.max(k));
        let entries = self.store.entries();
        let candidates: Vec<&[f32]> = pool
            .iter()
            .map(|&(i, _)| entries[i].embedding.as_slice())
            .collect();

        let picked = mmr::select(&embedding, &candidates, k, lambda);
        debug!("MMR picked {} of {} candidates", picked.len(), pool.len());

        Ok(picked
            .into_iter()
            .map(|p| {
                let (i, score) = pool[p];
                SearchResult {
                    page: entries[i].page.clone(),
                    score,
                }
            })
            .collect())
    }

    /// Wrap in a retriever with fixed parameters.
    pub fn as_retriever(self: &Arc<Self>, config: RetrieverConfig) -> Retriever {
        Retriever::new(Arc::clone(self), config)
    }
}
