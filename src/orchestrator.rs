//! Pipeline orchestrator for askmypdf.
//!
//! Turns a PDF into a ready-to-query [`AppContext`]:
//! load pages, embed and index them, connect the generator, build the chain.

use crate::config::{Prompts, Settings};
use crate::embedding::{self, Embedder};
use crate::error::{QueryError, Result};
use crate::llm::{self, Generator};
use crate::loader::{split_pages, PdfLoader};
use crate::rag::RagChain;
use crate::vector_store::{KnowledgeBase, RetrieverConfig, SearchResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Everything needed to answer questions about one processed document.
pub struct AppContext {
    document: PathBuf,
    knowledge_base: Arc<KnowledgeBase>,
    chain: RagChain,
}

impl AppContext {
    pub fn document(&self) -> &Path {
        &self.document
    }

    pub fn knowledge_base(&self) -> &Arc<KnowledgeBase> {
        &self.knowledge_base
    }

    /// Pages the chain would use for `query`, with similarity scores.
    pub async fn retrieve(&self, query: &str) -> std::result::Result<Vec<SearchResult>, QueryError> {
        self.chain.retriever().retrieve_scored(query).await
    }

    /// Answer a question about the document.
    pub async fn ask(&self, question: &str) -> Result<String> {
        Ok(self.chain.run(question).await?)
    }
}

/// The main orchestrator for the askmypdf pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompts: Prompts,
    embedder: Option<Arc<dyn Embedder>>,
    generator: Option<Arc<dyn Generator>>,
}

impl Orchestrator {
    /// Create an orchestrator that connects to the configured models on demand.
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let prompts = Prompts::load(settings.prompts.custom_dir.as_deref())?;

        Ok(Self {
            settings,
            prompts,
            embedder: None,
            generator: None,
        })
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        embedder: Arc<dyn Embedder>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        Self {
            settings,
            prompts,
            embedder: Some(embedder),
            generator: Some(generator),
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn embedder(&self) -> Result<Arc<dyn Embedder>> {
        match &self.embedder {
            Some(embedder) => Ok(Arc::clone(embedder)),
            None => {
                info!("Loading embedding model");
                Ok(embedding::from_settings(&self.settings).await?)
            }
        }
    }

    async fn generator(&self) -> Result<Arc<dyn Generator>> {
        match &self.generator {
            Some(generator) => Ok(Arc::clone(generator)),
            None => {
                info!("Setting up model");
                Ok(Arc::new(llm::from_settings(&self.settings).await?))
            }
        }
    }

    /// Load and index a document. Does not connect the generator.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn index_document(&self, path: &Path) -> Result<Arc<KnowledgeBase>> {
        info!("Using file: {}", path.display());

        let pages = PdfLoader::new(path).load()?;
        let pages = split_pages(
            pages,
            self.settings.document.chunk_chars,
            self.settings.document.chunk_overlap,
        );

        let embedder = self.embedder().await?;

        info!("Building vector store");
        let knowledge_base = KnowledgeBase::build(pages, embedder).await?;
        Ok(Arc::new(knowledge_base))
    }

    /// Load, index and wire up the full question-answering pipeline.
    pub async fn process_document(&self, path: &Path) -> Result<AppContext> {
        let knowledge_base = self.index_document(path).await?;
        let generator = self.generator().await?;

        info!("Preparing the retriever");
        let retriever = knowledge_base.as_retriever(RetrieverConfig::from(&self.settings.retrieval));

        info!("Preparing chain");
        let chain = RagChain::new(retriever, generator, self.prompts.rag.template.clone())?;

        Ok(AppContext {
            document: path.to_path_buf(),
            knowledge_base,
            chain,
        })
    }
}
