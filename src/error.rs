//! Error types for askmypdf.
//!
//! Each pipeline stage has its own error type. [`AskError`] is the
//! library-level error that wraps all of them.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Failure to read a PDF into pages.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("PDF not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse PDF {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    #[error("PDF has no pages: {0}")]
    Empty(PathBuf),
}

/// Failure to load an embedding model or to embed text.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error("Embedding model could not be loaded: {0}")]
    ModelLoad(String),

    #[error("Embedding inference failed: {0}")]
    Inference(String),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Failure to query the knowledge base.
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("No document has been processed yet")]
    NotIndexed,

    #[error("Failed to embed query: {0}")]
    Embedding(#[from] EmbeddingError),
}

/// Failure to load the generation model or to generate text.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation model could not be loaded: {0}")]
    ModelLoad(String),

    #[error("Generation failed: {0}")]
    Inference(String),

    #[error(
        "Prompt of ~{prompt_tokens} tokens plus {max_tokens} answer tokens exceeds the {context_window}-token context window"
    )]
    ContextOverflow {
        prompt_tokens: usize,
        max_tokens: usize,
        context_window: usize,
    },
}

/// Stage of the RAG chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Retrieve,
    Assemble,
    Generate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Retrieve => write!(f, "retrieve"),
            Stage::Assemble => write!(f, "assemble"),
            Stage::Generate => write!(f, "generate"),
        }
    }
}

/// Failure of one RAG chain invocation, tagged with the failing stage.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("retrieve stage failed: {0}")]
    Retrieve(#[from] QueryError),

    #[error("assemble stage failed: {0}")]
    Assemble(String),

    #[error("generate stage failed: {0}")]
    Generate(#[from] GenerationError),
}

impl ChainError {
    /// The stage at which the chain stopped.
    pub fn stage(&self) -> Stage {
        match self {
            ChainError::Retrieve(_) => Stage::Retrieve,
            ChainError::Assemble(_) => Stage::Assemble,
            ChainError::Generate(_) => Stage::Generate,
        }
    }
}

/// Library-level error type for askmypdf operations.
#[derive(Error, Debug)]
pub enum AskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Embedding(#[from] EmbeddingError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Env file error: {0}")]
    EnvFile(#[from] dotenv::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for askmypdf operations.
pub type Result<T> = std::result::Result<T, AskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_error_stage() {
        let err = ChainError::from(QueryError::NotIndexed);
        assert_eq!(err.stage(), Stage::Retrieve);
        assert!(err.to_string().starts_with("retrieve stage failed"));

        let err = ChainError::from(GenerationError::Inference("boom".to_string()));
        assert_eq!(err.stage(), Stage::Generate);

        let err = ChainError::Assemble("bad template".to_string());
        assert_eq!(err.stage(), Stage::Assemble);
    }
}
