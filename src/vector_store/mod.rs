//! In-memory vector store and the knowledge base built on it.
//!
//! The knowledge base owns the pages of one document and their embeddings,
//! and answers similarity and maximal-marginal-relevance queries.

mod knowledge_base;
mod memory;
pub mod mmr;
mod retriever;

pub use knowledge_base::KnowledgeBase;
pub use memory::MemoryVectorStore;
pub use retriever::{Retriever, RetrieverConfig};

use crate::loader::Page;

/// A page stored with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedPage {
    pub page: Page,
    pub embedding: Vec<f32>,
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched page.
    pub page: Page,
    /// Cosine similarity to the query (higher is better).
    pub score: f32,
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}
