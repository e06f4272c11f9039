//! Prompt templates for askmypdf.
//!
//! The RAG template can be replaced by placing a `rag.toml` file in the
//! custom prompts directory, e.g. to match a model family's instruction tags.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("valid regex"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub rag: RagPrompts,
}

/// Prompt for RAG answer generation.
///
/// `{{context}}` and `{{question}}` are substituted at run time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub template: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            template: r#"You are an assistant for question-answering tasks. Use the following pieces of retrieved context to answer the question. If you don't know the answer, just say that you don't know. Use three sentences maximum and keep the answer concise.
Question: {{question}}
Context: {{context}}
Answer:"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts, letting files in `custom_dir` override the defaults.
    pub fn load(custom_dir: Option<&str>) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Placeholders are filled in one pass, so substituted values are never
    /// expanded again. Unknown placeholders are left as they are.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| match vars.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }

    /// Whether `template` contains the `{{name}}` placeholder.
    pub fn has_placeholder(template: &str, name: &str) -> bool {
        template.contains(&format!("{{{{{}}}}}", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(Prompts::has_placeholder(&prompts.rag.template, "context"));
        assert!(Prompts::has_placeholder(&prompts.rag.template, "question"));
        assert!(prompts.rag.template.contains("three sentences maximum"));
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let template = "Q: {{question}}\nC: {{context}} {{unknown}}";
        let mut vars = HashMap::new();
        vars.insert("question".to_string(), "what is {{context}}?".to_string());
        vars.insert(
            "context".to_string(),
            "Section {{question}} of the manual.".to_string(),
        );

        for _ in 0..8 {
            assert_eq!(
                Prompts::render(template, &vars),
                "Q: what is {{context}}?\nC: Section {{question}} of the manual. {{unknown}}"
            );
        }
    }

    #[test]
    fn test_load_custom_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("rag.toml"),
            "template = \"[INST] {{context}} {{question}} [/INST]\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str()).unwrap();
        assert_eq!(prompts.rag.template, "[INST] {{context}} {{question}} [/INST]");
    }

    #[test]
    fn test_load_without_custom_dir() {
        let prompts = Prompts::load(None).unwrap();
        assert_eq!(prompts.rag.template, RagPrompts::default().template);
    }
}
