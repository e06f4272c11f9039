//! askmypdf - Ask questions about a PDF
//!
//! A local-first CLI tool that indexes a PDF page by page and answers
//! questions about it with a locally served language model.
//!
//! # Overview
//!
//! askmypdf allows you to:
//! - Load a PDF into one text unit per page
//! - Embed the pages into an in-memory vector index
//! - Retrieve relevant, non-redundant pages with max marginal relevance
//! - Ask questions and get grounded answers from a local model
//!
//! # Architecture
//!
//! - `config` - Configuration management (TOML, `.env`, environment)
//! - `loader` - PDF page extraction
//! - `embedding` - Embedding generation
//! - `vector_store` - In-memory index, MMR search and the retriever
//! - `llm` - Answer generation against a local inference server
//! - `rag` - Prompt assembly and the question-answering chain
//! - `orchestrator` - Pipeline coordination
//! - `session` - Interactive session state and history
//!
//! # Example
//!
//! ```rust,no_run
//! use askmypdf::config::Settings;
//! use askmypdf::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let document = settings.document_path();
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let context = orchestrator.process_document(&document).await?;
//!     let answer = context.ask("What is this document about?").await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod loader;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod vector_store;

pub use error::{AskError, Result};
