//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod search;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use search::run_search;

use crate::config::Settings;
use std::path::{Path, PathBuf};

/// The document a command should use.
///
/// `--file` may name an existing path or a file inside the asset directory.
/// Without it, the configured `PDF_PATH`/`PDF_NAME` document is used.
pub(crate) fn document_path(settings: &Settings, file: Option<&str>) -> PathBuf {
    match file {
        Some(f) if Path::new(f).is_file() => PathBuf::from(f),
        Some(f) => settings.resolve_document(f),
        None => settings.document_path(),
    }
}
