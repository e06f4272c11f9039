//! A knowledge base query interface with fixed search parameters.

use super::{KnowledgeBase, SearchResult};
use crate::config::RetrievalSettings;
use crate::error::QueryError;
use crate::loader::Page;
use std::sync::Arc;

/// Search parameters for a [`Retriever`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetrieverConfig {
    pub k: usize,
    pub fetch_k: usize,
    pub lambda: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            k: 4,
            fetch_k: 20,
            lambda: 0.5,
        }
    }
}

impl From<&RetrievalSettings> for RetrieverConfig {
    fn from(settings: &RetrievalSettings) -> Self {
        Self {
            k: settings.k,
            fetch_k: settings.fetch_k,
            lambda: settings.lambda,
        }
    }
}

/// MMR retriever over a shared knowledge base.
#[derive(Clone)]
pub struct Retriever {
    knowledge_base: Arc<KnowledgeBase>,
    config: RetrieverConfig,
}

impl Retriever {
    pub fn new(knowledge_base: Arc<KnowledgeBase>, config: RetrieverConfig) -> Self {
        Self {
            knowledge_base,
            config,
        }
    }

    pub fn config(&self) -> RetrieverConfig {
        self.config
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge_base
    }

    /// Scored pages relevant to `query`, in selection order.
    pub async fn retrieve_scored(&self, query: &str) -> Result<Vec<SearchResult>, QueryError> {
        self.knowledge_base
            .max_marginal_relevance_search(
                query,
                self.config.k,
                self.config.fetch_k,
                self.config.lambda,
            )
            .await
    }

    /// Pages relevant to `query`, in selection order.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<Page>, QueryError> {
        Ok(self
            .retrieve_scored(query)
            .await?
            .into_iter()
            .map(|r| r.page)
            .collect())
    }
}
