//! Environment-style overrides (`MODEL_NAME`, `PDF_PATH`, `PDF_NAME`, ...).
//!
//! Values come from an env file and from the process environment. The process
//! environment wins over the file, and both win over the TOML settings.

use super::Settings;
use crate::error::Result;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

pub const MODEL_NAME: &str = "MODEL_NAME";
pub const PDF_PATH: &str = "PDF_PATH";
pub const PDF_NAME: &str = "PDF_NAME";
/// Older name for `PDF_NAME`.
pub const TEMP_PDF: &str = "TEMP_PDF";
pub const OPENAI_API_BASE: &str = "OPENAI_API_BASE";

const KEYS: [&str; 5] = [MODEL_NAME, PDF_PATH, PDF_NAME, TEMP_PDF, OPENAI_API_BASE];

/// Recognised key/value overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvOverrides {
    vars: HashMap<String, String>,
}

impl EnvOverrides {
    /// Build overrides from arbitrary pairs, keeping only recognised keys.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| KEYS.contains(&k.as_str()))
            .collect();
        Self { vars }
    }

    /// Read an env file. A missing file yields no overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No env file at {}", path.display());
            return Ok(Self::default());
        }

        let mut pairs = Vec::new();
        for item in dotenv::from_path_iter(path)? {
            pairs.push(item?);
        }
        debug!("Read {} entries from {}", pairs.len(), path.display());
        Ok(Self::from_pairs(pairs))
    }

    /// Recognised keys from the process environment.
    pub fn from_process_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    /// Layer `other` on top of `self`.
    pub fn merge(mut self, other: EnvOverrides) -> Self {
        self.vars.extend(other.vars);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Write the overrides into `settings`.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(model) = self.get(MODEL_NAME) {
            settings.llm.model = model.to_string();
        }
        if let Some(dir) = self.get(PDF_PATH) {
            settings.document.asset_dir = dir.to_string();
        }
        match (self.get(PDF_NAME), self.get(TEMP_PDF)) {
            (Some(name), _) => settings.document.file_name = name.to_string(),
            (None, Some(name)) => {
                warn!("{} is deprecated, use {} instead", TEMP_PDF, PDF_NAME);
                settings.document.file_name = name.to_string();
            }
            (None, None) => {}
        }
        if let Some(base) = self.get(OPENAI_API_BASE) {
            settings.llm.api_base = base.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_pdf_path_and_name_resolve_to_joined_path() {
        let mut settings = Settings::default();
        EnvOverrides::from_pairs([(PDF_PATH, "/data/"), (PDF_NAME, "report.pdf")])
            .apply(&mut settings);
        assert_eq!(settings.document_path(), PathBuf::from("/data/report.pdf"));
    }

    #[test]
    fn test_temp_pdf_is_an_alias() {
        let mut settings = Settings::default();
        EnvOverrides::from_pairs([(TEMP_PDF, "old.pdf")]).apply(&mut settings);
        assert_eq!(settings.document.file_name, "old.pdf");

        let mut settings = Settings::default();
        EnvOverrides::from_pairs([(TEMP_PDF, "old.pdf"), (PDF_NAME, "new.pdf")])
            .apply(&mut settings);
        assert_eq!(settings.document.file_name, "new.pdf");
    }

    #[test]
    fn test_unknown_and_blank_keys_ignored() {
        let overrides =
            EnvOverrides::from_pairs([("HOME", "/root"), (MODEL_NAME, "  "), (PDF_NAME, "a.pdf")]);
        assert_eq!(overrides.get("HOME"), None);
        assert_eq!(overrides.get(MODEL_NAME), None);

        let mut settings = Settings::default();
        let default_model = settings.llm.model.clone();
        overrides.apply(&mut settings);
        assert_eq!(settings.llm.model, default_model);
        assert_eq!(settings.document.file_name, "a.pdf");
    }

    #[test]
    fn test_merge_prefers_later_layer() {
        let file = EnvOverrides::from_pairs([(MODEL_NAME, "file.gguf"), (PDF_NAME, "a.pdf")]);
        let process = EnvOverrides::from_pairs([(MODEL_NAME, "env.gguf")]);
        let merged = file.merge(process);
        assert_eq!(merged.get(MODEL_NAME), Some("env.gguf"));
        assert_eq!(merged.get(PDF_NAME), Some("a.pdf"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "MODEL_NAME=/models/mistral.gguf").unwrap();
        writeln!(file, "PDF_PATH=/srv/assets").unwrap();
        writeln!(file, "PDF_NAME=manual.pdf").unwrap();
        writeln!(file, "UNRELATED=1").unwrap();
        drop(file);

        let overrides = EnvOverrides::from_file(&path).unwrap();
        let mut settings = Settings::default();
        overrides.apply(&mut settings);
        assert_eq!(settings.llm.model, "/models/mistral.gguf");
        assert_eq!(settings.document_path(), PathBuf::from("/srv/assets/manual.pdf"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let overrides = EnvOverrides::from_file(Path::new("/nonexistent/.env")).unwrap();
        assert!(overrides.is_empty());
    }
}
