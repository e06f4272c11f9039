//! In-memory vector store implementation.

use super::{cosine_similarity, IndexedPage, SearchResult};
use crate::error::EmbeddingError;
use crate::loader::Page;

/// Exhaustive cosine-similarity index over a fixed set of pages.
///
/// All embeddings share one dimensionality, fixed by the first insert.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    entries: Vec<IndexedPage>,
    dimensions: Option<usize>,
}

impl MemoryVectorStore {
    /// Create a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page. Fails if the embedding size differs from earlier entries.
    pub fn insert(&mut self, page: Page, embedding: Vec<f32>) -> Result<(), EmbeddingError> {
        self.check_dimensions(&embedding)?;
        self.dimensions = Some(embedding.len());
        self.entries.push(IndexedPage { page, embedding });
        Ok(())
    }

    /// Ensure `embedding` matches the store's dimensionality.
    pub fn check_dimensions(&self, embedding: &[f32]) -> Result<(), EmbeddingError> {
        match self.dimensions {
            Some(expected) if expected != embedding.len() => {
                Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                })
            }
            _ => Ok(()),
        }
    }

    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[IndexedPage] {
        &self.entries
    }

    /// Indices of the `limit` entries most similar to `query`, best first.
    ///
    /// Ties keep insertion order.
    pub fn nearest(&self, query: &[f32], limit: usize) -> Vec<(usize, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        scored
    }

    /// Search for the pages most similar to `query`.
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<SearchResult> {
        self.nearest(query, limit)
            .into_iter()
            .map(|(i, score)| SearchResult {
                page: self.entries[i].page.clone(),
                score,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_vector_store() {
        let mut store = MemoryVectorStore::new();
        store.insert(Page::new(0, "Hello world"), vec![1.0, 0.0, 0.0]).unwrap();
        store.insert(Page::new(1, "Goodbye world"), vec![0.0, 1.0, 0.0]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.dimensions(), Some(3));

        let results = store.search(&[1.0, 0.0, 0.0], 10);
        assert_eq!(results.len(), 2);
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].page.index, 0);

        let results = store.search(&[0.0, 1.0, 0.0], 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].page.text, "Goodbye world");
    }

    #[test]
    fn test_dimension_mismatch_rejected() {
        let mut store = MemoryVectorStore::new();
        store.insert(Page::new(0, "a"), vec![1.0, 0.0]).unwrap();
        let err = store.insert(Page::new(1, "b"), vec![1.0, 0.0, 0.0]).unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::DimensionMismatch { expected: 2, actual: 3 }
        ));
        assert_eq!(store.len(), 1);
    }
}
