//! Interactive session state: the current document context and the
//! question/answer history shown to the user.

use crate::error::{QueryError, Result};
use crate::orchestrator::AppContext;
use crate::vector_store::SearchResult;
use chrono::{DateTime, Local};

/// One answered question. Kept for display only.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub question: String,
    pub answer: String,
    pub asked_at: DateTime<Local>,
}

/// Session owned by the user interface.
#[derive(Default)]
pub struct Session {
    context: Option<AppContext>,
    history: Vec<Exchange>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current document context. History is kept.
    pub fn install(&mut self, context: AppContext) {
        self.context = Some(context);
    }

    pub fn is_ready(&self) -> bool {
        self.context.is_some()
    }

    pub fn history(&self) -> &[Exchange] {
        &self.history
    }

    /// Retrieve pages for `query` from the processed document.
    pub async fn retrieve(&self, query: &str) -> std::result::Result<Vec<SearchResult>, QueryError> {
        let context = self.context.as_ref().ok_or(QueryError::NotIndexed)?;
        context.retrieve(query).await
    }

    /// Answer `question` and record it. Failures leave the history untouched.
    pub async fn ask(&mut self, question: &str) -> Result<String> {
        let context = self.context.as_ref().ok_or(QueryError::NotIndexed)?;
        let answer = context.ask(question).await?;

        self.history.push(Exchange {
            question: question.to_string(),
            answer: answer.clone(),
            asked_at: Local::now(),
        });
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Prompts, Settings};
    use crate::embedding::HashingEmbedder;
    use crate::error::{AskError, GenerationError};
    use crate::llm::{GenerationConfig, Generator};
    use crate::loader::write_test_pdf;
    use crate::orchestrator::Orchestrator;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed(GenerationConfig);

    #[async_trait]
    impl Generator for Fixed {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            Ok("Blue.".to_string())
        }

        fn config(&self) -> &GenerationConfig {
            &self.0
        }
    }

    #[tokio::test]
    async fn test_retrieve_before_processing_fails() {
        let session = Session::new();
        let err = session.retrieve("anything").await.unwrap_err();
        assert!(matches!(err, QueryError::NotIndexed));
    }

    #[tokio::test]
    async fn test_ask_before_processing_fails_without_history() {
        let mut session = Session::new();
        let err = session.ask("anything").await.unwrap_err();
        assert!(matches!(err, AskError::Query(QueryError::NotIndexed)));
        assert!(session.history().is_empty());
        assert!(!session.is_ready());
    }

    /// Answers the first question, then fails.
    struct FailsAfterFirst {
        calls: AtomicUsize,
        config: GenerationConfig,
    }

    #[async_trait]
    impl Generator for FailsAfterFirst {
        async fn generate(&self, _prompt: &str) -> std::result::Result<String, GenerationError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => Ok("Blue.".to_string()),
                _ => Err(GenerationError::Inference("server went away".to_string())),
            }
        }

        fn config(&self) -> &GenerationConfig {
            &self.config
        }
    }

    async fn session_with(generator: Arc<dyn Generator>, dir: &Path) -> Session {
        let path = dir.join("doc.pdf");
        write_test_pdf(&path, &["The sky is blue."]);

        let orchestrator = Orchestrator::with_components(
            Settings::default(),
            Prompts::default(),
            Arc::new(HashingEmbedder::default()),
            generator,
        );
        let mut session = Session::new();
        session.install(orchestrator.process_document(&path).await.unwrap());
        session
    }

    #[tokio::test]
    async fn test_failed_ask_keeps_existing_history() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Arc::new(FailsAfterFirst {
            calls: AtomicUsize::new(0),
            config: GenerationConfig::default(),
        });
        let mut session = session_with(generator, dir.path()).await;

        session.ask("What color is the sky?").await.unwrap();
        let err = session.ask("And the grass?").await.unwrap_err();

        assert!(matches!(err, AskError::Chain(_)));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].answer, "Blue.");
    }

    #[tokio::test]
    async fn test_ask_records_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut session =
            session_with(Arc::new(Fixed(GenerationConfig::default())), dir.path()).await;

        assert_eq!(session.ask("What color is the sky?").await.unwrap(), "Blue.");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].question, "What color is the sky?");
        assert_eq!(session.retrieve("sky").await.unwrap().len(), 1);
    }
}
