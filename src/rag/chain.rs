//! The question-to-answer chain: retrieve, assemble the prompt, generate.

use super::context::{context_char_budget, format_pages, truncate_context};
use crate::config::Prompts;
use crate::error::ChainError;
use crate::llm::{estimate_tokens, Generator};
use crate::loader::Page;
use crate::vector_store::Retriever;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, instrument};

static ANSWER_LABEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(assistant|answer)\s*:\s*").expect("valid regex"));

/// Immutable retrieval + prompt + model pipeline.
pub struct RagChain {
    retriever: Retriever,
    generator: Arc<dyn Generator>,
    template: String,
}

impl RagChain {
    /// Build a chain. The template must contain `{{context}}` and `{{question}}`.
    pub fn new(
        retriever: Retriever,
        generator: Arc<dyn Generator>,
        template: impl Into<String>,
    ) -> Result<Self, ChainError> {
        let template = template.into();
        for name in ["context", "question"] {
            if !Prompts::has_placeholder(&template, name) {
                return Err(ChainError::Assemble(format!(
                    "prompt template is missing the {{{{{}}}}} placeholder",
                    name
                )));
            }
        }

        info!("Building chain");
        Ok(Self {
            retriever,
            generator,
            template,
        })
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    /// Answer `question` from the indexed document.
    #[instrument(skip(self), fields(question = %question))]
    pub async fn run(&self, question: &str) -> Result<String, ChainError> {
        let pages = self.retriever.retrieve(question).await?;
        debug!(
            "Retrieved pages {:?}",
            pages.iter().map(Page::number).collect::<Vec<_>>()
        );

        let prompt = self.assemble(question, &pages)?;

        let raw = self.generator.generate(&prompt).await?;
        Ok(clean_answer(&raw))
    }

    /// Fill the template, truncating the context to fit the model's window.
    pub fn assemble(&self, question: &str, pages: &[Page]) -> Result<String, ChainError> {
        let config = self.generator.config();
        let fixed_tokens = estimate_tokens(&self.template) + estimate_tokens(question);
        let tokens_left = config.prompt_budget().checked_sub(fixed_tokens).ok_or_else(|| {
            ChainError::Assemble(format!(
                "question and template (~{} tokens) leave no room in the {}-token context window",
                fixed_tokens, config.context_window
            ))
        })?;

        let context = truncate_context(&format_pages(pages), context_char_budget(tokens_left));

        let mut vars = HashMap::new();
        vars.insert("context".to_string(), context);
        vars.insert("question".to_string(), question.to_string());
        Ok(Prompts::render(&self.template, &vars))
    }
}

/// Strip framing the model may add around the answer.
pub fn clean_answer(raw: &str) -> String {
    ANSWER_LABEL.replace(raw, "").trim().to_string()
}
