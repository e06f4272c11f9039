//! Pre-flight checks before expensive operations.
//!
//! Catches a missing document or model setting before any model is loaded.

use crate::config::{EmbeddingProvider, Settings};
use crate::error::{AskError, Result};
use std::path::Path;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Answering needs the document, the embedder and the generator.
    Ask,
    /// Retrieval needs the document and the embedder.
    Search,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings, document: &Path) -> Result<()> {
    check_document(document)?;
    match operation {
        Operation::Ask => check_model(settings)?,
        Operation::Search => {
            if settings.embedding.provider == EmbeddingProvider::Server {
                check_model(settings)?;
            }
        }
    }
    Ok(())
}

fn check_document(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(AskError::InvalidInput(format!(
            "Document not found: {}. Set PDF_PATH and PDF_NAME, or pass --file",
            path.display()
        )));
    }
    let is_pdf = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(AskError::InvalidInput(format!(
            "Not a PDF file: {}",
            path.display()
        )));
    }
    Ok(())
}

fn check_model(settings: &Settings) -> Result<()> {
    if settings.llm.model.trim().is_empty() {
        return Err(AskError::Config(
            "MODEL_NAME not set. Add it to .env or pass --model".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_document() {
        let settings = Settings::default();
        let err = check(Operation::Search, &settings, Path::new("/nope/missing.pdf")).unwrap_err();
        assert!(matches!(err, AskError::InvalidInput(_)));
    }

    #[test]
    fn test_non_pdf_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(check(Operation::Search, &Settings::default(), &path).is_err());
    }

    #[test]
    fn test_ask_needs_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.PDF");
        std::fs::write(&path, "%PDF-1.5").unwrap();

        let mut settings = Settings::default();
        assert!(check(Operation::Ask, &settings, &path).is_ok());

        settings.llm.model = String::new();
        assert!(matches!(
            check(Operation::Ask, &settings, &path),
            Err(AskError::Config(_))
        ));
    }
}
