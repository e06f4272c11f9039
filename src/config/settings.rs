//! Configuration settings for askmypdf.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{AskError, Result};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub document: DocumentSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub retrieval: RetrievalSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Where the document lives and how it is split into units.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    /// Asset directory holding PDFs (`PDF_PATH`).
    pub asset_dir: String,
    /// Default document filename inside the asset directory (`PDF_NAME`).
    pub file_name: String,
    /// Split pages longer than this many characters. `None` keeps one unit per page.
    pub chunk_chars: Option<usize>,
    /// Characters shared between consecutive windows when splitting.
    pub chunk_overlap: usize,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            asset_dir: "./asset".to_string(),
            file_name: "document.pdf".to_string(),
            chunk_chars: None,
            chunk_overlap: 200,
        }
    }
}

/// Answer generator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Base URL of the OpenAI-compatible inference server.
    pub api_base: String,
    /// Model identifier or model file path (`MODEL_NAME`).
    pub model: String,
    /// Context window in tokens.
    pub context_window: usize,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens to generate per answer.
    pub max_tokens: usize,
    /// Offload all layers to the GPU when the server supports it.
    pub gpu: bool,
    /// HTTP timeout for a single request, in seconds.
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8080/v1".to_string(),
            model: "models/llama-2-7b-chat.Q4_K_M.gguf".to_string(),
            context_window: 4000,
            temperature: 0.0,
            max_tokens: 256,
            gpu: true,
            timeout_secs: crate::openai::DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Embedding backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProvider {
    /// Embeddings endpoint of the inference server.
    #[default]
    Server,
    /// Offline feature-hashing embedder.
    Hashing,
}

impl std::str::FromStr for EmbeddingProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "server" | "openai" | "llama" => Ok(EmbeddingProvider::Server),
            "hashing" | "offline" => Ok(EmbeddingProvider::Hashing),
            _ => Err(format!("Unknown embedding provider: {}", s)),
        }
    }
}

impl std::fmt::Display for EmbeddingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmbeddingProvider::Server => write!(f, "server"),
            EmbeddingProvider::Hashing => write!(f, "hashing"),
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub provider: EmbeddingProvider,
    /// Embedding model. Falls back to the generation model when unset.
    pub model: Option<String>,
    /// Server URL for embeddings. Falls back to `llm.api_base` when unset.
    pub api_base: Option<String>,
    /// Vector size for the hashing embedder.
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingProvider::Server,
            model: None,
            api_base: None,
            dimensions: 384,
        }
    }
}

/// Retriever configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    /// Number of pages handed to the chain.
    pub k: usize,
    /// Candidate pool size before diversity re-ranking.
    pub fetch_k: usize,
    /// Relevance/diversity trade-off: 1.0 is pure relevance, 0.0 pure diversity.
    pub lambda: f32,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            k: 4,
            fetch_k: 20,
            lambda: 0.5,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("askmypdf")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded asset directory path.
    pub fn asset_dir(&self) -> PathBuf {
        Self::expand_path(&self.document.asset_dir)
    }

    /// Path of the default document.
    pub fn document_path(&self) -> PathBuf {
        self.resolve_document(&self.document.file_name)
    }

    /// Resolve a document name against the asset directory.
    ///
    /// Absolute names are returned unchanged.
    pub fn resolve_document(&self, name: &str) -> PathBuf {
        let name = Path::new(name);
        if name.is_absolute() {
            name.to_path_buf()
        } else {
            self.asset_dir().join(name)
        }
    }

    /// Embedding model, defaulting to the generation model.
    pub fn embedding_model(&self) -> &str {
        self.embedding.model.as_deref().unwrap_or(&self.llm.model)
    }

    /// Embedding server URL, defaulting to the generation server.
    pub fn embedding_api_base(&self) -> &str {
        self.embedding.api_base.as_deref().unwrap_or(&self.llm.api_base)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.llm.api_base).map_err(|e| {
            AskError::Config(format!("Invalid llm.api_base '{}': {}", self.llm.api_base, e))
        })?;
        if let Some(base) = &self.embedding.api_base {
            url::Url::parse(base).map_err(|e| {
                AskError::Config(format!("Invalid embedding.api_base '{}': {}", base, e))
            })?;
        }
        if self.llm.model.trim().is_empty() {
            return Err(AskError::Config(
                "No generation model configured. Set MODEL_NAME or llm.model".to_string(),
            ));
        }
        if self.retrieval.k == 0 {
            return Err(AskError::Config("retrieval.k must be at least 1".to_string()));
        }
        if !(0.0..=1.0).contains(&self.retrieval.lambda) {
            return Err(AskError::Config(format!(
                "retrieval.lambda must be within 0.0..=1.0, got {}",
                self.retrieval.lambda
            )));
        }
        if self.llm.max_tokens >= self.llm.context_window {
            return Err(AskError::Config(format!(
                "llm.max_tokens ({}) must be smaller than llm.context_window ({})",
                self.llm.max_tokens, self.llm.context_window
            )));
        }
        if let Some(chars) = self.document.chunk_chars {
            if self.document.chunk_overlap >= chars {
                return Err(AskError::Config(format!(
                    "document.chunk_overlap ({}) must be smaller than document.chunk_chars ({})",
                    self.document.chunk_overlap, chars
                )));
            }
        }
        if self.embedding.provider == EmbeddingProvider::Hashing && self.embedding.dimensions == 0 {
            return Err(AskError::Config(
                "embedding.dimensions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.retrieval.k, 4);
        assert_eq!(settings.retrieval.fetch_k, 20);
        assert_eq!(settings.llm.context_window, 4000);
    }

    #[test]
    fn test_resolve_document_joins_asset_dir() {
        let mut settings = Settings::default();
        settings.document.asset_dir = "/data/".to_string();
        settings.document.file_name = "report.pdf".to_string();
        assert_eq!(settings.document_path(), PathBuf::from("/data/report.pdf"));

        settings.document.asset_dir = "/data".to_string();
        assert_eq!(settings.document_path(), PathBuf::from("/data/report.pdf"));
    }

    #[test]
    fn test_resolve_absolute_document() {
        let settings = Settings::default();
        assert_eq!(
            settings.resolve_document("/tmp/other.pdf"),
            PathBuf::from("/tmp/other.pdf")
        );
    }

    #[test]
    fn test_embedding_falls_back_to_llm() {
        let mut settings = Settings::default();
        settings.llm.model = "mistral.gguf".to_string();
        assert_eq!(settings.embedding_model(), "mistral.gguf");
        assert_eq!(settings.embedding_api_base(), settings.llm.api_base);

        settings.embedding.model = Some("nomic-embed".to_string());
        assert_eq!(settings.embedding_model(), "nomic-embed");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.llm.api_base = "not a url".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.retrieval.lambda = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.llm.max_tokens = 5000;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.document.chunk_chars = Some(100);
        settings.document.chunk_overlap = 100;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [retrieval]
            k = 2

            [embedding]
            provider = "hashing"
            "#,
        )
        .unwrap();
        assert_eq!(settings.retrieval.k, 2);
        assert_eq!(settings.retrieval.fetch_k, 20);
        assert_eq!(settings.embedding.provider, EmbeddingProvider::Hashing);
    }

    #[test]
    fn test_embedding_provider_from_str() {
        assert_eq!("hashing".parse::<EmbeddingProvider>(), Ok(EmbeddingProvider::Hashing));
        assert_eq!("OpenAI".parse::<EmbeddingProvider>(), Ok(EmbeddingProvider::Server));
        assert!("bogus".parse::<EmbeddingProvider>().is_err());
    }
}
